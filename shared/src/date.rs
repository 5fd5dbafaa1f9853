//! 时间格式化工具
//!
//! - `to_datetime_local`: 生成 `<input type="datetime-local">` 接受的值
//! - `display_date`: 将后端返回的时间字符串转为界面显示格式

use chrono::{DateTime, NaiveDateTime, Timelike};

const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

/// 截断到分钟并格式化为 `YYYY-MM-DDTHH:MM`
pub fn to_datetime_local(dt: NaiveDateTime) -> String {
    let truncated = dt
        .with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt);
    truncated.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// 解析 RFC 3339 或无时区的本地时间
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", DATETIME_LOCAL_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// 界面显示用的时间；无法解析时原样返回
pub fn display_date(raw: &str) -> String {
    parse_datetime(raw)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}
