use chrono::{Datelike, NaiveDate};

/// `1000000` -> `1,000,000원`.
pub fn krw(amount: u64) -> String {
    format!("{}원", group_thousands(amount))
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One decimal place, as shown on cards and in the comparison table.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// `2024-12-01` -> `2024년 12월 1일`.
pub fn date_ko(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}

pub fn read_time(minutes: u32) -> String {
    format!("{minutes}분")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(krw(0), "0원");
        assert_eq!(krw(1000), "1,000원");
        assert_eq!(krw(100000), "100,000원");
        assert_eq!(krw(1000000), "1,000,000원");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn formats_percent_and_dates() {
        assert_eq!(percent(22.5), "22.5%");
        assert_eq!(percent(16.0 / 3.0), "5.3%");
        let d = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(date_ko(d), "2024년 12월 1일");
        assert_eq!(read_time(8), "8분");
    }
}
