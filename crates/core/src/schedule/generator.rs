//! Schedule generation.
//!
//! Three deterministic plans derive a booking's obligations from
//! `remaining = total - token`:
//!
//! | Plan | Obligations | Due |
//! |---|---|---|
//! | Construction-linked | 7 milestones (10% then 6 × 15%) | start + 0, 3, … 18 months |
//! | Time-linked | 12 × remaining / 12 | start + 1 … 12 months |
//! | Down-payment | 20% and 80% | start + 30 days, start + 24 months |

use chrono::{Days, Months, NaiveDate};
use estate_shared::types::money::{percent_of, round_currency};
use estate_shared::types::{BookingId, ScheduleId};
use rust_decimal::Decimal;

use super::error::ScheduleError;
use super::types::{GenerateScheduleRequest, PlanType, RoundingPolicy, ScheduleEntry, ScheduleStatus};

/// Construction milestones: (percentage, months after start, label).
pub const CONSTRUCTION_MILESTONES: [(u32, u32, &str); 7] = [
    (10, 0, "Booking"),
    (15, 3, "Foundation"),
    (15, 6, "Plinth"),
    (15, 9, "Structure"),
    (15, 12, "Brickwork"),
    (15, 15, "Finishing"),
    (15, 18, "Possession"),
];

/// Number of time-linked installments.
pub const TIME_LINKED_INSTALLMENTS: u32 = 12;

/// Down-payment plan: (percentage, due offset, label).
const DOWN_PAYMENT_SPLIT: [(u32, DueOffset, &str); 2] = [
    (20, DueOffset::Days(30), "Down Payment"),
    (80, DueOffset::Months(24), "Balance on Completion"),
];

#[derive(Debug, Clone, Copy)]
enum DueOffset {
    Days(u64),
    Months(u32),
}

/// An obligation before it is materialized as a [`ScheduleEntry`].
#[derive(Debug, Clone)]
struct Draft {
    label: String,
    due_date: NaiveDate,
    percentage: Option<Decimal>,
    amount: Decimal,
}

/// Stateless schedule generator.
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    /// Generates the ordered obligations for a booking.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive total, a token outside
    /// `0..=total`, a blank booking number, or a due date past the calendar.
    pub fn generate(
        request: &GenerateScheduleRequest,
        rounding: RoundingPolicy,
    ) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        Self::validate(request)?;

        let remaining = request.remaining_amount();
        let mut drafts = match request.plan_type {
            PlanType::ConstructionLinked => Self::construction_linked(remaining, request.start_date)?,
            PlanType::TimeLinked => Self::time_linked(remaining, request.start_date)?,
            PlanType::DownPayment => Self::down_payment(remaining, request.start_date)?,
        };

        if rounding == RoundingPolicy::ReconcileFinal {
            Self::reconcile_final(&mut drafts, remaining);
        }

        let booking_number = request.booking_number.trim();
        Ok(drafts
            .into_iter()
            .zip(1u32..)
            .map(|(draft, sequence)| ScheduleEntry {
                id: ScheduleId::new(),
                booking_id: request.booking_id,
                sequence,
                code: schedule_code(booking_number, sequence),
                label: draft.label,
                due_date: draft.due_date,
                percentage: draft.percentage,
                amount: draft.amount,
                paid_amount: Decimal::ZERO,
                status: ScheduleStatus::Pending,
                payment_id: None,
                paid_date: None,
            })
            .collect())
    }

    /// Rejects a second generation for the same booking.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyGenerated` if `existing` is not empty.
    pub fn ensure_not_generated(booking_id: BookingId, existing: &[ScheduleEntry]) -> Result<(), ScheduleError> {
        if existing.iter().any(|s| s.booking_id == booking_id) {
            return Err(ScheduleError::AlreadyGenerated(booking_id));
        }
        Ok(())
    }

    fn validate(request: &GenerateScheduleRequest) -> Result<(), ScheduleError> {
        if request.total_amount <= Decimal::ZERO {
            return Err(ScheduleError::InvalidTotal(request.total_amount));
        }
        if request.token_amount < Decimal::ZERO || request.token_amount > request.total_amount {
            return Err(ScheduleError::InvalidToken {
                token: request.token_amount,
                total: request.total_amount,
            });
        }
        if request.booking_number.trim().is_empty() {
            return Err(ScheduleError::MissingBookingNumber);
        }
        Ok(())
    }

    fn construction_linked(remaining: Decimal, start: NaiveDate) -> Result<Vec<Draft>, ScheduleError> {
        CONSTRUCTION_MILESTONES
            .iter()
            .map(|(percent, months, label)| {
                let percentage = Decimal::from(*percent);
                Ok(Draft {
                    label: (*label).to_string(),
                    due_date: add_months(start, *months)?,
                    percentage: Some(percentage),
                    amount: percent_of(remaining, percentage),
                })
            })
            .collect()
    }

    fn time_linked(remaining: Decimal, start: NaiveDate) -> Result<Vec<Draft>, ScheduleError> {
        let installment = round_currency(remaining / Decimal::from(TIME_LINKED_INSTALLMENTS));
        (1..=TIME_LINKED_INSTALLMENTS)
            .map(|n| {
                Ok(Draft {
                    label: format!("Installment {n}"),
                    due_date: add_months(start, n)?,
                    percentage: None,
                    amount: installment,
                })
            })
            .collect()
    }

    fn down_payment(remaining: Decimal, start: NaiveDate) -> Result<Vec<Draft>, ScheduleError> {
        DOWN_PAYMENT_SPLIT
            .iter()
            .map(|(percent, offset, label)| {
                let percentage = Decimal::from(*percent);
                let due_date = match offset {
                    DueOffset::Days(days) => start
                        .checked_add_days(Days::new(*days))
                        .ok_or(ScheduleError::DateOutOfRange(start))?,
                    DueOffset::Months(months) => add_months(start, *months)?,
                };
                Ok(Draft {
                    label: (*label).to_string(),
                    due_date,
                    percentage: Some(percentage),
                    amount: percent_of(remaining, percentage),
                })
            })
            .collect()
    }

    /// Moves the rounding residual onto the final obligation.
    fn reconcile_final(drafts: &mut [Draft], remaining: Decimal) {
        let scheduled: Decimal = drafts.iter().map(|d| d.amount).sum();
        if let Some(last) = drafts.last_mut() {
            last.amount += remaining - scheduled;
        }
    }
}

/// Formats an obligation code as `{bookingNumber}-{seq:03}`.
#[must_use]
pub fn schedule_code(booking_number: &str, sequence: u32) -> String {
    format!("{booking_number}-{sequence:03}")
}

fn add_months(start: NaiveDate, months: u32) -> Result<NaiveDate, ScheduleError> {
    start
        .checked_add_months(Months::new(months))
        .ok_or(ScheduleError::DateOutOfRange(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(plan_type: PlanType, total: Decimal, token: Decimal) -> GenerateScheduleRequest {
        GenerateScheduleRequest {
            booking_id: BookingId::new(),
            booking_number: "BK-0042".to_string(),
            total_amount: total,
            token_amount: token,
            plan_type,
            start_date: date(2026, 1, 15),
        }
    }

    #[test]
    fn test_time_linked_equal_installments() {
        let schedule =
            ScheduleGenerator::generate(&request(PlanType::TimeLinked, dec!(120000), Decimal::ZERO), RoundingPolicy::None)
                .unwrap();

        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|s| s.amount == dec!(10000)));
        let due: Vec<NaiveDate> = schedule.iter().map(|s| s.due_date).collect();
        let expected: Vec<NaiveDate> = (1..=12)
            .map(|n| date(2026, 1, 15).checked_add_months(Months::new(n)).unwrap())
            .collect();
        assert_eq!(due, expected);
        assert_eq!(schedule[0].due_date, date(2026, 2, 15));
        assert_eq!(schedule[11].due_date, date(2027, 1, 15));
        assert_eq!(schedule[0].label, "Installment 1");
    }

    #[test]
    fn test_construction_linked_table() {
        let schedule = ScheduleGenerator::generate(
            &request(PlanType::ConstructionLinked, dec!(1100000), dec!(100000)),
            RoundingPolicy::None,
        )
        .unwrap();

        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule[0].label, "Booking");
        assert_eq!(schedule[0].amount, dec!(100000));
        assert_eq!(schedule[0].due_date, date(2026, 1, 15));
        assert_eq!(schedule[1].label, "Foundation");
        assert_eq!(schedule[1].amount, dec!(150000));
        assert_eq!(schedule[1].due_date, date(2026, 4, 15));
        assert_eq!(schedule[6].label, "Possession");
        assert_eq!(schedule[6].due_date, date(2027, 7, 15));

        let total: Decimal = schedule.iter().map(|s| s.amount).sum();
        assert_eq!(total, dec!(1000000));
    }

    #[test]
    fn test_down_payment_split() {
        let schedule =
            ScheduleGenerator::generate(&request(PlanType::DownPayment, dec!(500000), Decimal::ZERO), RoundingPolicy::None)
                .unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].amount, dec!(100000));
        assert_eq!(schedule[0].due_date, date(2026, 2, 14));
        assert_eq!(schedule[1].amount, dec!(400000));
        assert_eq!(schedule[1].due_date, date(2028, 1, 15));
    }

    #[test]
    fn test_codes_and_initial_state() {
        let schedule =
            ScheduleGenerator::generate(&request(PlanType::TimeLinked, dec!(1200), Decimal::ZERO), RoundingPolicy::None)
                .unwrap();

        assert_eq!(schedule[0].code, "BK-0042-001");
        assert_eq!(schedule[11].code, "BK-0042-012");
        assert!(schedule.iter().all(|s| s.status == ScheduleStatus::Pending));
        assert!(schedule.iter().all(|s| s.paid_amount.is_zero()));
    }

    #[test]
    fn test_rounding_drift_kept_by_default() {
        let schedule =
            ScheduleGenerator::generate(&request(PlanType::TimeLinked, dec!(1000), Decimal::ZERO), RoundingPolicy::None)
                .unwrap();

        assert!(schedule.iter().all(|s| s.amount == dec!(83.33)));
        let total: Decimal = schedule.iter().map(|s| s.amount).sum();
        assert_eq!(total, dec!(999.96));
    }

    #[test]
    fn test_rounding_reconciled_on_final() {
        let schedule = ScheduleGenerator::generate(
            &request(PlanType::TimeLinked, dec!(1000), Decimal::ZERO),
            RoundingPolicy::ReconcileFinal,
        )
        .unwrap();

        assert_eq!(schedule[10].amount, dec!(83.33));
        assert_eq!(schedule[11].amount, dec!(83.37));
        let total: Decimal = schedule.iter().map(|s| s.amount).sum();
        assert_eq!(total, dec!(1000));
    }

    #[rstest]
    #[case(Decimal::ZERO, Decimal::ZERO)]
    #[case(dec!(-10), Decimal::ZERO)]
    fn test_rejects_non_positive_total(#[case] total: Decimal, #[case] token: Decimal) {
        assert_eq!(
            ScheduleGenerator::generate(&request(PlanType::TimeLinked, total, token), RoundingPolicy::None),
            Err(ScheduleError::InvalidTotal(total))
        );
    }

    #[rstest]
    #[case(dec!(-1))]
    #[case(dec!(1001))]
    fn test_rejects_token_out_of_range(#[case] token: Decimal) {
        assert!(matches!(
            ScheduleGenerator::generate(&request(PlanType::TimeLinked, dec!(1000), token), RoundingPolicy::None),
            Err(ScheduleError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_booking_number() {
        let mut req = request(PlanType::DownPayment, dec!(1000), Decimal::ZERO);
        req.booking_number = "  ".to_string();
        assert_eq!(
            ScheduleGenerator::generate(&req, RoundingPolicy::None),
            Err(ScheduleError::MissingBookingNumber)
        );
    }

    #[test]
    fn test_ensure_not_generated() {
        let req = request(PlanType::DownPayment, dec!(1000), Decimal::ZERO);
        let existing = ScheduleGenerator::generate(&req, RoundingPolicy::None).unwrap();

        assert!(ScheduleGenerator::ensure_not_generated(req.booking_id, &[]).is_ok());
        assert_eq!(
            ScheduleGenerator::ensure_not_generated(req.booking_id, &existing),
            Err(ScheduleError::AlreadyGenerated(req.booking_id))
        );
        assert!(ScheduleGenerator::ensure_not_generated(BookingId::new(), &existing).is_ok());
    }
}
