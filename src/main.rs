// 出行助手命令行入口

use std::io::Write;
use travel_assistant_agent::display::render_report;
use travel_assistant_agent::{Config, Orchestrator, UserQuery};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 缺少 API key 时直接退出
    let config = Config::from_env()?;

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    println!("🧳 出行助手启动中...\n");

    let orchestrator = Orchestrator::from_config(&config)?;

    println!("💡 {} 就绪（输入 'quit' 退出）", orchestrator.name());
    println!("   模型: {}  接口: {}\n", config.model, config.base_url);
    println!("─────────────────────────────────────────────\n");

    loop {
        let Some(from) = prompt("🛫 From")? else { break };
        let Some(location) = prompt("📍 Destination")? else { break };
        let Some(text) = prompt("❓ What would you like to know?")? else { break };
        let Some(start) = prompt("📅 Start date (YYYY-MM-DD, optional)")? else { break };
        let Some(end) = prompt("📅 End date (optional)")? else { break };

        if text.is_empty() && location.is_empty() {
            continue;
        }

        let query = UserQuery::new(text)
            .with_from(from)
            .with_location(location)
            .with_dates(start, Some(end));

        println!("\n🤖 正在查询...\n");

        match orchestrator.coordinate_request(&query).await {
            Ok(response) => {
                print!("{}", render_report(&response));
                println!("─────────────────────────────────────────────\n");
            }
            Err(e) => {
                eprintln!("\n❌ 错误: {}", e);
                println!("─────────────────────────────────────────────\n");
            }
        }
    }

    println!("\n👋 再见！");
    Ok(())
}

/// 读取一行输入；输入 quit 或到达 EOF 时返回 None
fn prompt(label: &str) -> anyhow::Result<Option<String>> {
    print!("{}: ", label);
    std::io::stdout().flush()?;

    let mut input = String::new();
    if std::io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    let input = input.trim();
    if input.eq_ignore_ascii_case("quit") {
        return Ok(None);
    }
    Ok(Some(input.to_string()))
}
