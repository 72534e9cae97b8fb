// 出行助手演示 - 用几条典型查询跑一遍完整编排
//
// 需要在环境变量或 .env 中设置 OPENAI_API_KEY，可选 MODEL / API_BASE_URL。
// 演示内容：
// 1. 带日期的航班查询（触发航班 + 综合资讯）
// 2. 景点类查询（触发景点 + 综合资讯）
// 3. 关键词未命中的查询（只有综合资讯）

use travel_assistant_agent::display::render_report;
use travel_assistant_agent::{Config, Orchestrator, UserQuery};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    println!("🧳 出行助手演示启动...\n");
    println!("═════════════════════════════════════════════\n");

    let orchestrator = Orchestrator::from_config(&config)?;

    let demo_queries = vec![
        UserQuery::new("flight to Paris")
            .with_from("NYC")
            .with_location("Paris")
            .with_dates("2025-06-01", None),
        UserQuery::new("what should I visit in Kyoto?")
            .with_location("Kyoto")
            .with_interests(vec!["temples".to_string(), "gardens".to_string()]),
        UserQuery::new("best museums").with_location("Rome"),
    ];

    for (i, query) in demo_queries.iter().enumerate() {
        println!("🎯 查询 {}: {}\n", i + 1, query.text);

        let plan = orchestrator.create_plan(query);
        println!(
            "   计划: 航班={} 景点={} 资讯={}\n",
            plan.needs_flights(),
            plan.needs_attractions(),
            plan.needs_general_info()
        );

        match orchestrator.coordinate_request(query).await {
            Ok(response) => print!("{}", render_report(&response)),
            Err(e) => eprintln!("❌ 错误: {}", e),
        }

        println!("═════════════════════════════════════════════\n");
    }

    println!("✅ 演示完成");
    Ok(())
}
