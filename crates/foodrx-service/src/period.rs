//! Calendar math in the configured timezone.
//!
//! "Today", day boundaries and period ends are all computed in one fixed
//! UTC offset and returned as UTC instants.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc, Weekday,
};

use foodrx_core::config::PipelineConfig;
use foodrx_core::error::AppError;
use foodrx_core::result::AppResult;
use foodrx_entity::tracker::PeriodType;

/// Day and week boundaries for one timezone.
#[derive(Debug, Clone, Copy)]
pub struct PeriodCalendar {
    offset: FixedOffset,
    week_end: Weekday,
}

impl PeriodCalendar {
    /// Create a calendar from an offset and the last day of the week.
    pub fn new(offset: FixedOffset, week_end: Weekday) -> Self {
        Self { offset, week_end }
    }

    /// Create a calendar from pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> AppResult<Self> {
        Ok(Self::new(config.offset()?, config.week_end()?))
    }

    /// UTC calendar with Saturday as the last day of the week.
    pub fn utc() -> Self {
        Self::new(Utc.fix(), Weekday::Sat)
    }

    /// The local calendar day containing `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// First instant of `day`.
    pub fn start_of(&self, day: NaiveDate) -> DateTime<Utc> {
        let local = day.and_time(NaiveTime::MIN);
        (local - Duration::seconds(i64::from(self.offset.local_minus_utc()))).and_utc()
    }

    /// Last millisecond of `day`.
    pub fn end_of(&self, day: NaiveDate) -> AppResult<DateTime<Utc>> {
        let next = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::internal(format!("No day after {day}")))?;
        Ok(self.start_of(next) - Duration::milliseconds(1))
    }

    /// `[start, end)` of the local day containing `now`.
    pub fn day_bounds(&self, now: DateTime<Utc>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let today = self.today(now);
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::internal(format!("No day after {today}")))?;
        Ok((self.start_of(today), self.start_of(tomorrow)))
    }

    /// Last instant of the most recently closed period.
    ///
    /// Daily: the end of yesterday. Weekly: the end of the latest
    /// week-ending day strictly before today.
    pub fn period_end(&self, period: PeriodType, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        let today = self.today(now);
        let days_back = match period {
            PeriodType::Daily => 1,
            PeriodType::Weekly => {
                let today_idx = today.weekday().num_days_from_monday();
                let end_idx = self.week_end.num_days_from_monday();
                (today_idx + 6 - end_idx) % 7 + 1
            }
        };
        let day = today
            .checked_sub_days(Days::new(u64::from(days_back)))
            .ok_or_else(|| AppError::internal(format!("No day {days_back} before {today}")))?;
        self.end_of(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn end_ms(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc(y, m, d, 23, 59, 59) + Duration::milliseconds(999)
    }

    #[test]
    fn test_daily_end_is_yesterday() {
        let cal = PeriodCalendar::utc();
        let now = utc(2024, 5, 5, 0, 0, 30);
        assert_eq!(cal.period_end(PeriodType::Daily, now).unwrap(), end_ms(2024, 5, 4));
    }

    #[test]
    fn test_weekly_end_on_sunday_is_saturday() {
        let cal = PeriodCalendar::utc();
        // 2024-05-05 is a Sunday.
        let now = utc(2024, 5, 5, 0, 0, 30);
        assert_eq!(cal.period_end(PeriodType::Weekly, now).unwrap(), end_ms(2024, 5, 4));
    }

    #[test]
    fn test_weekly_end_is_strictly_before_today() {
        let cal = PeriodCalendar::utc();
        // 2024-05-04 is a Saturday; the previous Saturday closed the last week.
        let now = utc(2024, 5, 4, 12, 0, 0);
        assert_eq!(cal.period_end(PeriodType::Weekly, now).unwrap(), end_ms(2024, 4, 27));
    }

    #[test]
    fn test_weekly_end_midweek() {
        let cal = PeriodCalendar::utc();
        // Wednesday.
        let now = utc(2024, 5, 8, 3, 0, 0);
        assert_eq!(cal.period_end(PeriodType::Weekly, now).unwrap(), end_ms(2024, 5, 4));
    }

    #[test]
    fn test_custom_week_end() {
        let cal = PeriodCalendar::new(Utc.fix(), Weekday::Sun);
        // Monday after Sunday 2024-05-05.
        let now = utc(2024, 5, 6, 0, 5, 0);
        assert_eq!(cal.period_end(PeriodType::Weekly, now).unwrap(), end_ms(2024, 5, 5));
    }

    #[test]
    fn test_negative_offset_shifts_day() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let cal = PeriodCalendar::new(offset, Weekday::Sat);
        // 04:00 UTC on May 5 is 23:00 on May 4 locally.
        let now = utc(2024, 5, 5, 4, 0, 0);
        assert_eq!(cal.today(now), NaiveDate::from_ymd_opt(2024, 5, 4).unwrap());
        assert_eq!(
            cal.period_end(PeriodType::Daily, now).unwrap(),
            utc(2024, 5, 4, 4, 59, 59) + Duration::milliseconds(999)
        );
    }

    #[test]
    fn test_day_bounds() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let cal = PeriodCalendar::new(offset, Weekday::Sat);
        let (start, end) = cal.day_bounds(utc(2024, 5, 4, 23, 30, 0)).unwrap();
        assert_eq!(start, utc(2024, 5, 4, 22, 0, 0));
        assert_eq!(end, utc(2024, 5, 5, 22, 0, 0));
    }
}
