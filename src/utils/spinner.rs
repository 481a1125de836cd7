use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// 終端機載入動畫
///
/// 內部是一個 indicatif spinner，clone 後共用同一條進度列。
/// 日誌 writer 透過 [`Spinner::suspend`] 在寫出前先把動畫收起來，
/// 所以兩者不會擠在同一行。
#[derive(Clone)]
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// stderr 不是終端機或 `enabled == false` 時使用 hidden bar，不畫任何東西
    pub fn new(enabled: bool) -> Self {
        if !enabled || !std::io::stderr().is_terminal() {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn is_drawing(&self) -> bool {
        !self.bar.is_hidden()
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    /// 開始轉動；回傳的 guard 被 stop 或 drop 時清除動畫
    pub fn start(&self, message: &str) -> SpinnerGuard {
        self.bar.reset();
        self.bar.set_message(message.to_string());
        self.bar.enable_steady_tick(TICK);
        SpinnerGuard {
            bar: self.bar.clone(),
        }
    }

    /// 暫時清掉動畫執行 `f`，結束後重畫
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }
}

/// 一次性的停止點；錯誤路徑上的 `?` 和中斷時的 future drop 都會經過 Drop
pub struct SpinnerGuard {
    bar: ProgressBar,
}

impl SpinnerGuard {
    pub fn stop(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
