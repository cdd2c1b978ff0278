use chrono::{Datelike, NaiveDate};
use fixedbitset::FixedBitSet;

/// the days one service code operates: a date range, the weekdays active
/// within it, and explicit added or removed exception dates.
#[derive(Debug, Clone)]
pub struct ServicePeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Monday-first, matching `Weekday::num_days_from_monday`
    pub weekdays: [bool; 7],
    pub added_dates: Vec<NaiveDate>,
    pub removed_dates: Vec<NaiveDate>,
}

impl ServicePeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, weekdays: [bool; 7]) -> ServicePeriod {
        ServicePeriod {
            start_date,
            end_date,
            weekdays,
            added_dates: Vec::new(),
            removed_dates: Vec::new(),
        }
    }

    /// a service running every day of the date range.
    pub fn daily(start_date: NaiveDate, end_date: NaiveDate) -> ServicePeriod {
        ServicePeriod::new(start_date, end_date, [true; 7])
    }

    /// removed dates override added dates; exception dates override the
    /// range and weekday rules.
    pub fn active_on(&self, date: NaiveDate) -> bool {
        if self.removed_dates.contains(&date) {
            return false;
        }
        if self.added_dates.contains(&date) {
            return true;
        }
        if date < self.start_date || date > self.end_date {
            return false;
        }
        self.weekdays[date.weekday().num_days_from_monday() as usize]
    }
}

/// calendar over all service codes. a trip is active on a date iff the
/// date's service bitset contains the trip's service code.
#[derive(Debug, Clone, Default)]
pub struct ServiceCalendar {
    services: Vec<ServicePeriod>,
}

impl ServiceCalendar {
    pub fn new(services: Vec<ServicePeriod>) -> ServiceCalendar {
        ServiceCalendar { services }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// the set of service codes operating on `date`.
    pub fn active_services_for_date(&self, date: NaiveDate) -> FixedBitSet {
        let mut active = FixedBitSet::with_capacity(self.services.len());
        for (service_code, service) in self.services.iter().enumerate() {
            if service.active_on(date) {
                active.insert(service_code);
            }
        }
        active
    }
}

#[cfg(test)]
mod test {
    use super::{ServiceCalendar, ServicePeriod};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date should parse")
    }

    #[test]
    fn test_weekday_rule() {
        // weekdays only, 2025-06-02 is a Monday
        let weekdays = [true, true, true, true, true, false, false];
        let service = ServicePeriod::new(date("2025-06-01"), date("2025-06-30"), weekdays);

        assert!(service.active_on(date("2025-06-02")), "Monday");
        assert!(service.active_on(date("2025-06-06")), "Friday");
        assert!(!service.active_on(date("2025-06-07")), "Saturday");
        assert!(!service.active_on(date("2025-06-08")), "Sunday");
    }

    #[test]
    fn test_date_range_bounds() {
        let service = ServicePeriod::daily(date("2025-06-01"), date("2025-06-30"));
        assert!(!service.active_on(date("2025-05-31")));
        assert!(service.active_on(date("2025-06-01")));
        assert!(service.active_on(date("2025-06-30")));
        assert!(!service.active_on(date("2025-07-01")));
    }

    #[test]
    fn test_exception_dates() {
        let mut service = ServicePeriod::daily(date("2025-06-01"), date("2025-06-30"));
        service.removed_dates.push(date("2025-06-15"));
        service.added_dates.push(date("2025-07-04"));

        assert!(!service.active_on(date("2025-06-15")), "removed date");
        assert!(service.active_on(date("2025-07-04")), "added date outside range");

        // a date both added and removed is removed
        service.added_dates.push(date("2025-06-15"));
        assert!(!service.active_on(date("2025-06-15")));
    }

    #[test]
    fn test_active_services_bitset() {
        let calendar = ServiceCalendar::new(vec![
            ServicePeriod::daily(date("2025-06-01"), date("2025-06-30")),
            ServicePeriod::daily(date("2025-07-01"), date("2025-07-31")),
            ServicePeriod::daily(date("2025-06-01"), date("2025-07-31")),
        ]);

        let june = calendar.active_services_for_date(date("2025-06-15"));
        assert!(june.contains(0));
        assert!(!june.contains(1));
        assert!(june.contains(2));

        let july = calendar.active_services_for_date(date("2025-07-15"));
        assert!(!july.contains(0));
        assert!(july.contains(1));
        assert!(july.contains(2));
    }
}
