//! 降雨消息格式化

use crate::event::Event;

/// 组装降雨通知
///
/// ```text
/// @alice @bob 雨がふってるよ！
/// http://tokyo-ame.jwa.or.jp/ 12:35:00
/// ```
pub fn compose_rain_message(mentions: &[String], page_url: &str, event: &Event) -> String {
    let mentions: Vec<&str> = mentions
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();
    let time = event.timestamp().format("%H:%M:%S");

    if mentions.is_empty() {
        format!("雨がふってるよ！\n{} {}", page_url, time)
    } else {
        format!("{} 雨がふってるよ！\n{} {}", mentions.join(" "), page_url, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn event() -> Event {
        Event::rain(Local.with_ymd_and_hms(2024, 6, 15, 12, 35, 7).single().unwrap())
    }

    #[test]
    fn test_message_with_mentions() {
        let msg = compose_rain_message(
            &["@alice".to_string(), "@bob".to_string()],
            "http://tokyo-ame.jwa.or.jp/",
            &event(),
        );
        assert_eq!(msg, "@alice @bob 雨がふってるよ！\nhttp://tokyo-ame.jwa.or.jp/ 12:35:07");
    }

    #[test]
    fn test_message_without_mentions() {
        let msg = compose_rain_message(&[], "http://tokyo-ame.jwa.or.jp/", &event());
        assert_eq!(msg, "雨がふってるよ！\nhttp://tokyo-ame.jwa.or.jp/ 12:35:07");
    }

    #[test]
    fn test_blank_mentions_are_dropped() {
        let msg = compose_rain_message(
            &["".to_string(), " @carol ".to_string()],
            "http://localhost/",
            &event(),
        );
        assert!(msg.starts_with("@carol 雨がふってるよ！"));
    }
}
