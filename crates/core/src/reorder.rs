//! Reorder quantity and days-of-stock math.
//!
//! Pure functions, no I/O. The quantity calculation converts a sales
//! velocity and a days-of-cover target into a suggested order quantity,
//! honoring vendor packaging constraints (case packs, reorder multiples) and
//! stock floor/ceiling alerts. The same functions back the vendor dashboard,
//! the inventory snapshot view, and the catalog audit, so every screen
//! agrees on what "needs ordering" means.

/// Inputs for [`calculate_reorder_quantity`].
///
/// `Default` gives the neutral configuration: no velocity, no packaging
/// constraints, no floor/ceiling, zero stock on hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderParams {
    /// Average units sold per day over the trailing window.
    pub velocity: f64,
    /// Target days of supply to restore.
    pub supply_days: i64,
    /// Vendor lead time in days.
    pub lead_time_days: i64,
    /// Safety buffer in days.
    pub safety_days: i64,
    /// Order quantity granularity (e.g., pallet quantities). 1 = none.
    pub reorder_multiple: i64,
    /// Units per vendor case. 1 = no case constraint.
    pub case_pack: i64,
    /// Stock floor alert. 0 = no floor configured.
    pub stock_alert_min: i64,
    /// Stock ceiling alert. `None` = no ceiling.
    pub stock_alert_max: Option<i64>,
    /// Current stock on hand. Negative values are legal (data-correction
    /// artifacts) and increase the suggested quantity.
    pub current_stock: i64,
}

impl Default for ReorderParams {
    fn default() -> Self {
        Self {
            velocity: 0.0,
            supply_days: 0,
            lead_time_days: 0,
            safety_days: 0,
            reorder_multiple: 1,
            case_pack: 1,
            stock_alert_min: 0,
            stock_alert_max: None,
            current_stock: 0,
        }
    }
}

/// Sentinel returned by [`calculate_days_of_stock`] for zero-velocity items:
/// effectively infinite runway, used to deprioritize dead stock in sorts.
pub const DAYS_OF_STOCK_NO_MOVEMENT: f64 = 999.0;

#[allow(clippy::cast_possible_truncation)] // quantities are far below 2^52
fn ceil_to_i64(value: f64) -> i64 {
    value.ceil() as i64
}

/// Round `quantity` up to the next multiple of `multiple`.
///
/// Multiples of 1 or less, and non-positive quantities, pass through
/// unchanged (0 stays 0 rather than rounding up to a full case).
fn round_up_to_multiple(quantity: i64, multiple: i64) -> i64 {
    if multiple <= 1 || quantity <= 0 {
        return quantity;
    }
    quantity.div_ceil(multiple) * multiple
}

/// Compute the suggested order quantity for a variation.
///
/// The target is `velocity * (supply + lead + safety)` days of cover, with a
/// minimum order of one case (or one reorder multiple, or one unit) for
/// zero-velocity items so dead stock with empty shelves never silently
/// suggests 0. A configured stock floor is always cleared, not just touched.
/// The deficit against current stock is then rounded up to the case pack
/// first and the reorder multiple second - the multiple can push a
/// case-aligned quantity higher - and finally capped so the order never
/// takes stock past the configured ceiling.
///
/// Never returns a negative number for any input combination.
#[must_use]
pub fn calculate_reorder_quantity(params: &ReorderParams) -> i64 {
    let threshold_days = params.supply_days + params.lead_time_days + params.safety_days;

    #[allow(clippy::cast_precision_loss)] // day counts are small
    let mut target = if params.velocity <= 0.0 {
        if params.case_pack > 1 {
            params.case_pack
        } else if params.reorder_multiple > 1 {
            params.reorder_multiple
        } else {
            1
        }
    } else {
        ceil_to_i64(params.velocity * threshold_days as f64)
    };

    // Clear the floor, not just touch it.
    if params.stock_alert_min > 0 {
        target = target.max(params.stock_alert_min + 1);
    }

    let mut suggested = (target - params.current_stock).max(0);

    // Packaging constraints: case pack rounds first, reorder multiple
    // second. The multiple may push past a case-aligned value.
    suggested = round_up_to_multiple(suggested, params.case_pack);
    suggested = round_up_to_multiple(suggested, params.reorder_multiple);

    // Never order past the ceiling. At/above the ceiling yields exactly 0.
    if let Some(max) = params.stock_alert_max {
        suggested = suggested.min(max - params.current_stock).max(0);
    }

    suggested.max(0)
}

/// Days of stock remaining at the current velocity, rounded to one decimal.
///
/// Exhausted stock is always 0 days regardless of velocity (checked first,
/// even when both are zero). Zero velocity with stock on hand returns the
/// [`DAYS_OF_STOCK_NO_MOVEMENT`] sentinel.
#[must_use]
pub fn calculate_days_of_stock(current_stock: i64, velocity: f64) -> f64 {
    if current_stock <= 0 {
        return 0.0;
    }
    if velocity <= 0.0 {
        return DAYS_OF_STOCK_NO_MOVEMENT;
    }
    #[allow(clippy::cast_precision_loss)] // stock counts are small
    let days = current_stock as f64 / velocity;
    (days * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> ReorderParams {
        ReorderParams::default()
    }

    #[test]
    fn test_basic_velocity_target() {
        // target = 2 * 45 = 90, need = 90 - 20 = 70, no rounding
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 45,
            current_stock: 20,
            ..params()
        });
        assert_eq!(qty, 70);
    }

    #[test]
    fn test_case_pack_then_reorder_multiple() {
        // target = 45, need = 35, case pack 6 -> 36, already a multiple of 12
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 1.0,
            supply_days: 45,
            case_pack: 6,
            reorder_multiple: 12,
            current_stock: 10,
            ..params()
        });
        assert_eq!(qty, 36);
    }

    #[test]
    fn test_reorder_multiple_pushes_past_case_alignment() {
        // need = 35, case pack 6 -> 36, multiple 10 -> 40
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 1.0,
            supply_days: 45,
            case_pack: 6,
            reorder_multiple: 10,
            current_stock: 10,
            ..params()
        });
        assert_eq!(qty, 40);
    }

    #[test]
    fn test_at_or_above_ceiling_yields_zero() {
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 45,
            stock_alert_max: Some(50),
            current_stock: 60,
            ..params()
        });
        assert_eq!(qty, 0);

        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 45,
            stock_alert_max: Some(50),
            current_stock: 50,
            ..params()
        });
        assert_eq!(qty, 0);
    }

    #[test]
    fn test_ceiling_caps_suggestion() {
        // target = 90, need = 70, cap = 50 - 20 = 30
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 45,
            stock_alert_max: Some(50),
            current_stock: 20,
            ..params()
        });
        assert_eq!(qty, 30);
    }

    #[test]
    fn test_zero_velocity_minimum_order() {
        // Dead stock still gets a minimum suggestion, never 0.
        assert_eq!(calculate_reorder_quantity(&params()), 1);
        assert_eq!(
            calculate_reorder_quantity(&ReorderParams {
                case_pack: 6,
                ..params()
            }),
            6
        );
        assert_eq!(
            calculate_reorder_quantity(&ReorderParams {
                reorder_multiple: 12,
                ..params()
            }),
            12
        );
        // Case pack wins over reorder multiple for the floor quantity,
        // then the multiple rounds it up.
        assert_eq!(
            calculate_reorder_quantity(&ReorderParams {
                case_pack: 6,
                reorder_multiple: 4,
                ..params()
            }),
            8
        );
    }

    #[test]
    fn test_stock_floor_is_cleared_not_touched() {
        // velocity target 10 < floor 20, so target = 21
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 1.0,
            supply_days: 10,
            stock_alert_min: 20,
            ..params()
        });
        assert_eq!(qty, 21);
    }

    #[test]
    fn test_stock_floor_zero_means_no_floor() {
        // min = 0 must not force target = max(1, target); velocity target rules
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 1.0,
            supply_days: 5,
            stock_alert_min: 0,
            current_stock: 5,
            ..params()
        });
        assert_eq!(qty, 0);
    }

    #[test]
    fn test_negative_current_stock_increases_suggestion() {
        let base = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 45,
            current_stock: 0,
            ..params()
        });
        let negative = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 45,
            current_stock: -10,
            ..params()
        });
        assert_eq!(base, 90);
        assert_eq!(negative, 100);
    }

    #[test]
    fn test_lead_and_safety_days_extend_threshold() {
        // threshold = 30 + 10 + 5 = 45 days at velocity 2 -> 90
        let qty = calculate_reorder_quantity(&ReorderParams {
            velocity: 2.0,
            supply_days: 30,
            lead_time_days: 10,
            safety_days: 5,
            ..params()
        });
        assert_eq!(qty, 90);
    }

    #[test]
    fn test_fractional_velocity_ceils_target() {
        // 0.3 * 10 = 3.0 -> 3; 0.35 * 10 = 3.5 -> 4
        assert_eq!(
            calculate_reorder_quantity(&ReorderParams {
                velocity: 0.3,
                supply_days: 10,
                ..params()
            }),
            3
        );
        assert_eq!(
            calculate_reorder_quantity(&ReorderParams {
                velocity: 0.35,
                supply_days: 10,
                ..params()
            }),
            4
        );
    }

    #[test]
    fn test_never_negative_over_parameter_grid() {
        // Deterministic grid standing in for a property check.
        for velocity in [0.0, 0.5, 2.0] {
            for current_stock in [-20, 0, 10, 100] {
                for case_pack in [1, 6] {
                    for reorder_multiple in [1, 12] {
                        for stock_alert_max in [None, Some(0), Some(50)] {
                            for stock_alert_min in [0, 5] {
                                let qty = calculate_reorder_quantity(&ReorderParams {
                                    velocity,
                                    supply_days: 30,
                                    case_pack,
                                    reorder_multiple,
                                    stock_alert_min,
                                    stock_alert_max,
                                    current_stock,
                                    ..params()
                                });
                                assert!(qty >= 0, "negative quantity: {qty}");
                                if stock_alert_max.is_none() {
                                    if case_pack > 1 && reorder_multiple == 1 && qty > 0 {
                                        assert_eq!(qty % case_pack, 0);
                                    }
                                    if reorder_multiple > 1 && qty > 0 {
                                        assert_eq!(qty % reorder_multiple, 0);
                                    }
                                }
                                if let Some(max) = stock_alert_max
                                    && current_stock >= max
                                {
                                    assert_eq!(qty, 0);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_days_of_stock_basic() {
        let days = calculate_days_of_stock(10, 3.0);
        assert!((days - 3.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_days_of_stock_exhausted_wins_over_zero_velocity() {
        assert!((calculate_days_of_stock(0, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((calculate_days_of_stock(0, 5.0) - 0.0).abs() < f64::EPSILON);
        assert!((calculate_days_of_stock(-3, 5.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_days_of_stock_no_movement_sentinel() {
        let days = calculate_days_of_stock(10, 0.0);
        assert!((days - DAYS_OF_STOCK_NO_MOVEMENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_days_of_stock_one_decimal_rounding() {
        // 7 / 3 = 2.333... -> 2.3; 5 / 3 = 1.666... -> 1.7
        assert!((calculate_days_of_stock(7, 3.0) - 2.3).abs() < f64::EPSILON);
        assert!((calculate_days_of_stock(5, 3.0) - 1.7).abs() < f64::EPSILON);
    }
}
