use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Bytes as binary gigabytes with two decimals, e.g. `7.45 GB`.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB)
}

pub fn format_mhz(mhz: f64) -> String {
    format!("{mhz:.1} MHz")
}

/// Wall-clock time since boot split into whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uptime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Uptime {
    pub fn from_secs(total: u64) -> Self {
        Uptime {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    /// `3d 4h 12min`
    pub fn short(&self) -> String {
        format!("{}d {}h {}min", self.days, self.hours, self.minutes)
    }

    /// `3 days, 4h 12min 9s`
    pub fn long(&self) -> String {
        let unit = if self.days == 1 { "day" } else { "days" };
        format!(
            "{} {unit}, {}h {}min {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
