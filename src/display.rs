// 结果展示 - 解析资讯正文并生成纯文本报告

use crate::protocol::ComprehensiveResponse;
use std::fmt::Write;

/// 资讯正文中的一个块
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideBlock {
    /// 以 `##` 开头的段落
    Heading(String),
    /// 以 `**` 结尾的行：地点名称及其后的说明
    Place { name: String, description: String },
    /// 普通文本行
    Text(String),
}

/// 按段落（空行分隔）与行解析资讯正文
pub fn parse_guide(content: &str) -> Vec<GuideBlock> {
    let content = content.replacen("Top Attractions", "Top Attractions\n", 1);
    let mut blocks = Vec::new();

    for paragraph in content.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if let Some(heading) = paragraph.strip_prefix("##") {
            blocks.push(GuideBlock::Heading(heading.trim().to_string()));
            continue;
        }

        for line in paragraph.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            blocks.push(parse_line(line));
        }
    }

    blocks
}

fn parse_line(line: &str) -> GuideBlock {
    if !line.ends_with("**") {
        return GuideBlock::Text(line.to_string());
    }

    let marker = line.rfind("**").unwrap_or(line.len());
    let name = line[..marker]
        .trim()
        .trim_start_matches(|c: char| {
            matches!(c, '*' | '-' | '.') || c.is_ascii_digit() || c.is_whitespace()
        });
    let description = line[marker + 2..].trim();

    GuideBlock::Place {
        name: name.to_string(),
        description: description.to_string(),
    }
}

/// 生成纯文本报告；错误集中放在末尾
pub fn render_report(response: &ComprehensiveResponse) -> String {
    let mut out = String::new();

    if let Some(flights) = &response.flights {
        let _ = writeln!(out, "✈️  Flights ({})", flights.len());
        for flight in flights {
            let stops = match flight.stops {
                0 => "direct".to_string(),
                1 => "1 stop".to_string(),
                n => format!("{} stops", n),
            };
            let _ = writeln!(
                out,
                "  • {} {}  {} {} → {} {}  {:.2} {}  ({})",
                flight.airline,
                flight.flight_number,
                flight.departure.airport,
                flight.departure.time,
                flight.arrival.airport,
                flight.arrival.time,
                flight.price,
                flight.currency,
                stops
            );
        }
        out.push('\n');
    }

    if let Some(attractions) = &response.attractions {
        let _ = writeln!(out, "📍 Attractions ({})", attractions.len());
        for attraction in attractions {
            let _ = writeln!(
                out,
                "  • {}  ★ {:.1} ({} reviews)  {}",
                attraction.name, attraction.rating, attraction.review_count, attraction.price_level
            );
            let _ = writeln!(out, "    {}", attraction.description);
            if !attraction.categories.is_empty() {
                let _ = writeln!(out, "    [{}]", attraction.categories.join(", "));
            }
            let _ = writeln!(out, "    {}", attraction.url);
            let _ = writeln!(out, "    image: {}", attraction.image_url);
        }
        out.push('\n');
    }

    if let Some(info) = &response.general_info {
        let _ = writeln!(out, "📚 Travel Guide");
        for block in parse_guide(&info.content) {
            match block {
                GuideBlock::Heading(text) => {
                    let _ = writeln!(out, "\n== {} ==", text);
                }
                GuideBlock::Place { name, description } => {
                    let _ = writeln!(out, "  📌 {}", name);
                    if !description.is_empty() {
                        let _ = writeln!(out, "     {}", description);
                    }
                }
                GuideBlock::Text(text) => {
                    let _ = writeln!(out, "  {}", text);
                }
            }
        }
        if !info.sources.is_empty() {
            let _ = writeln!(out, "\n  Sources:");
            for source in &info.sources {
                let _ = writeln!(out, "    - {}", source);
            }
        }
        if let Some(error) = &info.error {
            let _ = writeln!(out, "  ⚠️  {}", error);
        }
        out.push('\n');
    }

    if !response.errors.is_empty() {
        let _ = writeln!(out, "❌ Errors");
        for error in &response.errors {
            let _ = writeln!(out, "  - {}", error);
        }
    }

    out
}
