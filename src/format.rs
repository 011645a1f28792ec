use chrono::{Datelike, NaiveDate};

/// Turns dates into display strings for the pickers and period labels.
pub trait DateFormatter {
    /// Compact form used inside ranges, e.g. `12 мар. 2025`.
    fn short(&self, date: NaiveDate) -> String;

    /// Single-day form, e.g. `12 марта 2025 г.`.
    fn long(&self, date: NaiveDate) -> String;

    /// Heading above the day grid, e.g. `март 2025 г.`.
    fn month_label(&self, year: i32, month: u32) -> String;

    /// Label for a confirmed range. Falls back to [`DateFormatter::long`] for
    /// a single day.
    fn range(&self, start: NaiveDate, end: NaiveDate) -> String {
        if start == end {
            return self.long(start);
        }
        format!("{} - {}", self.short(start), self.short(end))
    }
}

const MONTHS_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

const MONTHS_GENITIVE: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
    "октября", "ноября", "декабря",
];

const MONTHS_NOMINATIVE: [&str; 12] = [
    "январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август", "сентябрь",
    "октябрь", "ноябрь", "декабрь",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RussianFormatter;

impl RussianFormatter {
    fn day_month(date: NaiveDate) -> String {
        format!("{} {}", date.day(), month_name(&MONTHS_SHORT, date.month()))
    }
}

impl DateFormatter for RussianFormatter {
    fn short(&self, date: NaiveDate) -> String {
        format!("{} {}", Self::day_month(date), date.year())
    }

    fn long(&self, date: NaiveDate) -> String {
        format!(
            "{} {} {} г.",
            date.day(),
            month_name(&MONTHS_GENITIVE, date.month()),
            date.year()
        )
    }

    fn month_label(&self, year: i32, month: u32) -> String {
        format!("{} {year} г.", month_name(&MONTHS_NOMINATIVE, month))
    }

    // Year is printed once when both ends share it.
    fn range(&self, start: NaiveDate, end: NaiveDate) -> String {
        if start == end {
            return self.long(start);
        }
        if start.year() == end.year() {
            format!("{} - {} {} г.", Self::day_month(start), Self::day_month(end), end.year())
        } else {
            format!("{} - {} г.", self.short(start), self.short(end))
        }
    }
}

fn month_name(table: &[&'static str; 12], month: u32) -> &'static str {
    table[(month.clamp(1, 12) - 1) as usize]
}

/// Groups digits in threes with a narrow no-break space, as `ru-RU` does.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_uses_long_form() {
        let fmt = RussianFormatter;
        assert_eq!(fmt.range(date(2025, 3, 12), date(2025, 3, 12)), "12 марта 2025 г.");
    }

    #[test]
    fn range_in_one_year_prints_year_once() {
        let fmt = RussianFormatter;
        assert_eq!(
            fmt.range(date(2025, 3, 12), date(2025, 3, 18)),
            "12 мар. - 18 мар. 2025 г."
        );
    }

    #[test]
    fn range_across_years_prints_both() {
        let fmt = RussianFormatter;
        assert_eq!(
            fmt.range(date(2024, 12, 30), date(2025, 1, 2)),
            "30 дек. 2024 - 2 янв. 2025 г."
        );
    }

    #[test]
    fn month_label_is_nominative() {
        assert_eq!(RussianFormatter.month_label(2025, 5), "май 2025 г.");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(124567), "124\u{202f}567");
        assert_eq!(group_thousands(1234567), "1\u{202f}234\u{202f}567");
    }
}
