//! 浏览器日志
//!
//! tracing 的 fmt 层输出到 `console`，按级别选择 console 方法。
//! wasm32-unknown-unknown 上没有系统时钟，因此不打印时间戳。

use std::io;

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// 默认级别，可在构建时通过 `FAHSNA_LOG` 覆盖
const DEFAULT_LEVEL: Level = Level::INFO;

fn level_from_env() -> Level {
    option_env!("FAHSNA_LOG")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LEVEL)
}

pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let msg = wasm_bindgen::JsValue::from_str(line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&msg),
            Level::WARN => web_sys::console::warn_1(&msg),
            Level::INFO => web_sys::console::info_1(&msg),
            _ => web_sys::console::debug_1(&msg),
        }
    }
}

#[derive(Clone, Copy)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// 安装全局订阅者，重复调用无副作用
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(level_from_env())
        .with_ansi(false)
        .without_time()
        .try_init();
}
