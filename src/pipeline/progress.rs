/// Counts completed units against a total fixed when the pass begins.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    completed: usize,
    total: usize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the denominator for a new pass and return the starting percent.
    ///
    /// An empty pass is already complete.
    pub fn begin(&mut self, total: usize) -> f64 {
        self.completed = 0;
        self.total = total;
        self.percent()
    }

    /// Record one finished unit, skipped or translated
    pub fn advance(&mut self) -> f64 {
        if self.completed < self.total {
            self.completed += 1;
        }
        self.percent()
    }

    pub fn reset(&mut self) {
        self.completed = 0;
        self.total = 0;
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        100.0 * self.completed as f64 / self.total as f64
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Status lines shown while a run is in flight
pub const STATUS_MESSAGES: [&str; 10] = [
    "🤖 هوش مصنوعی در حال پردازش...",
    "🧠 AI is analyzing content...",
    "🔍 جستجو در پایگاه داده فارسی...",
    "📚 مراجعه به فرهنگ لغت تخصصی...",
    "🎬 ترجمه اصطلاحات سینمایی...",
    "✨ بهبود کیفیت ترجمه...",
    "🚀 آماده‌سازی محتوای فارسی...",
    "🎯 تطبیق با فرهنگ ایرانی...",
    "💫 نهایی‌سازی ترجمه...",
    "✅ تکمیل فرآیند ترجمه...",
];

/// Pick the status line for a percentage, clamped to the last entry
pub fn status_message(percent: f64) -> &'static str {
    let last = STATUS_MESSAGES.len() - 1;
    let index = ((percent.max(0.0) / 100.0) * STATUS_MESSAGES.len() as f64).floor() as usize;
    STATUS_MESSAGES[index.min(last)]
}
