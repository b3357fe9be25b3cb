use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq)]
enum DatePart {
    Year,
    Month,
    Day,
}

/// Segmented YYYY-MM-DD input. Left/Right pick a segment, Up/Down step it,
/// digits overwrite it. The held date is always a valid calendar date.
pub struct DateField {
    pub date: NaiveDate,
    part: DatePart,
    buffer: String,
}

impl DateField {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            part: DatePart::Year,
            buffer: String::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => {
                self.part = match self.part {
                    DatePart::Year => DatePart::Day,
                    DatePart::Month => DatePart::Year,
                    DatePart::Day => DatePart::Month,
                };
                self.buffer.clear();
            }
            KeyCode::Right => {
                self.part = match self.part {
                    DatePart::Year => DatePart::Month,
                    DatePart::Month => DatePart::Day,
                    DatePart::Day => DatePart::Year,
                };
                self.buffer.clear();
            }
            KeyCode::Up => self.step(1),
            KeyCode::Down => self.step(-1),
            KeyCode::Char(c) if c.is_ascii_digit() => self.push_digit(c),
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            _ => {}
        }
    }

    fn step(&mut self, delta: i32) {
        self.buffer.clear();
        match self.part {
            DatePart::Day => {
                self.date = self
                    .date
                    .checked_add_signed(Duration::days(delta as i64))
                    .unwrap_or(self.date);
            }
            DatePart::Month => {
                let mut year = self.date.year();
                let mut month = self.date.month() as i32 + delta;
                if month < 1 {
                    month = 12;
                    year -= 1;
                } else if month > 12 {
                    month = 1;
                    year += 1;
                }
                self.set_clamped(year, month as u32, self.date.day());
            }
            DatePart::Year => {
                self.set_clamped(self.date.year() + delta, self.date.month(), self.date.day());
            }
        }
    }

    fn push_digit(&mut self, c: char) {
        self.buffer.push(c);
        let width = match self.part {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        };
        if self.buffer.len() < width {
            return;
        }

        let value: u32 = self.buffer.parse().unwrap_or(0);
        match self.part {
            DatePart::Year => {
                if (1900..=2100).contains(&value) {
                    self.set_clamped(value as i32, self.date.month(), self.date.day());
                }
            }
            DatePart::Month => {
                if (1..=12).contains(&value) {
                    self.set_clamped(self.date.year(), value, self.date.day());
                }
            }
            DatePart::Day => {
                if (1..=days_in_month(self.date.year(), self.date.month())).contains(&value) {
                    self.set_clamped(self.date.year(), self.date.month(), value);
                }
            }
        }
        self.buffer.clear();
    }

    /// Replaces the date, pulling the day back to the end of a shorter month.
    fn set_clamped(&mut self, year: i32, month: u32, day: u32) {
        let day = day.min(days_in_month(year, month));
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            self.date = date;
        }
    }

    pub fn display(&self, editing: bool) -> String {
        if !editing {
            return self.date.format("%Y-%m-%d").to_string();
        }

        let segment = |part: DatePart, text: String| {
            if part == self.part {
                if self.buffer.is_empty() {
                    format!("[{}]", text)
                } else {
                    format!("[{}]", self.buffer)
                }
            } else {
                text
            }
        };

        format!(
            "{}-{}-{}",
            segment(DatePart::Year, format!("{:04}", self.date.year())),
            segment(DatePart::Month, format!("{:02}", self.date.month())),
            segment(DatePart::Day, format!("{:02}", self.date.day())),
        )
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn field_at(s: &str) -> DateField {
        DateField::new(date(s))
    }

    #[test]
    fn stepping_the_month_clamps_the_day() {
        let mut field = field_at("2025-01-31");
        field.handle_key(KeyCode::Right); // year -> month
        field.handle_key(KeyCode::Up);
        assert_eq!(field.date, date("2025-02-28"));
    }

    #[test]
    fn stepping_the_month_down_from_january_wraps_the_year() {
        let mut field = field_at("2025-01-15");
        field.handle_key(KeyCode::Right);
        field.handle_key(KeyCode::Down);
        assert_eq!(field.date, date("2024-12-15"));
    }

    #[test]
    fn stepping_the_day_crosses_month_boundaries() {
        let mut field = field_at("2025-03-31");
        field.handle_key(KeyCode::Right);
        field.handle_key(KeyCode::Right); // year -> month -> day
        field.handle_key(KeyCode::Up);
        assert_eq!(field.date, date("2025-04-01"));
    }

    #[test]
    fn typed_digits_replace_the_active_segment() {
        let mut field = field_at("2025-06-15");
        field.handle_key(KeyCode::Right); // month
        field.handle_key(KeyCode::Char('0'));
        field.handle_key(KeyCode::Char('2'));
        assert_eq!(field.date, date("2025-02-15"));
    }

    #[test]
    fn out_of_range_input_is_ignored() {
        let mut field = field_at("2025-06-15");
        field.handle_key(KeyCode::Right);
        field.handle_key(KeyCode::Right); // day
        field.handle_key(KeyCode::Char('3'));
        field.handle_key(KeyCode::Char('9'));
        assert_eq!(field.date, date("2025-06-15"));
    }

    #[test]
    fn display_brackets_the_active_segment_while_editing() {
        let mut field = field_at("2025-06-15");
        assert_eq!(field.display(false), "2025-06-15");
        assert_eq!(field.display(true), "[2025]-06-15");
        field.handle_key(KeyCode::Right);
        assert_eq!(field.display(true), "2025-[06]-15");
    }
}
