use super::jurisdiction::JurisdictionCode;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rate applied when a document does not name one
pub const DEFAULT_GST_RATE: Decimal = dec!(18);

/// Largest amount magnitude, in rupees, accepted for pricing
pub const MAX_AMOUNT: Decimal = dec!(100000000000000000000);

/// Largest GST rate magnitude, in percent
pub const MAX_RATE: Decimal = dec!(100);

/// Amount or rate outside the range that can be priced without overflow
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount {0} is out of range (magnitude above {max})", max = MAX_AMOUNT)]
    AmountOutOfRange(Decimal),
    #[error("GST rate {0}% is out of range (magnitude above {max}%)", max = MAX_RATE)]
    RateOutOfRange(Decimal),
}

pub fn checked_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount.abs() > MAX_AMOUNT {
        return Err(AmountError::AmountOutOfRange(amount));
    }
    Ok(amount)
}

pub fn checked_rate(rate: Decimal) -> Result<Decimal, AmountError> {
    if rate.abs() > MAX_RATE {
        return Err(AmountError::RateOutOfRange(rate));
    }
    Ok(rate)
}

/// Round half up to paise, always at a scale of two.
///
/// Midpoints go toward positive infinity, so -0.125 becomes -0.12.
pub fn round_money(amount: Decimal) -> Decimal {
    let strategy = if amount.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    let mut rounded = amount.round_dp_with_strategy(2, strategy);
    rounded.rescale(2);
    rounded
}

/// GST due on a taxable amount, split by jurisdiction.
///
/// Intra-state supplies carry equal CGST and SGST halves; inter-state supplies
/// carry IGST only. Each component is rounded to paise on its own and the
/// totals are sums of the rounded components, so `total_gst` can differ by a
/// paisa from rounding the unrounded sum once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GstBreakdown {
    #[schemars(with = "f64")]
    pub cgst: Decimal,
    #[schemars(with = "f64")]
    pub sgst: Decimal,
    #[schemars(with = "f64")]
    pub igst: Decimal,
    #[schemars(with = "f64")]
    pub total_gst: Decimal,
    #[schemars(with = "f64")]
    pub total_amount: Decimal,
    pub is_intra_state: bool,
}

/// Compute the GST split for a supply between two jurisdictions.
///
/// `rate_percent` is the combined rate (18 for 18%). Amounts are not validated:
/// a negative `taxable_amount` yields negative tax. Callers bound their inputs
/// with [`checked_amount`] and [`checked_rate`], which keeps the products in
/// range of `Decimal`.
pub fn calculate_gst(
    company: JurisdictionCode,
    counterparty: JurisdictionCode,
    rate_percent: Decimal,
    taxable_amount: Decimal,
) -> GstBreakdown {
    let is_intra_state = company == counterparty;

    let (cgst, sgst, igst) = if is_intra_state {
        let half = rate_percent / dec!(2);
        let component = round_money(taxable_amount * half / dec!(100));
        (component, component, Decimal::ZERO)
    } else {
        let igst = round_money(taxable_amount * rate_percent / dec!(100));
        (Decimal::ZERO, Decimal::ZERO, igst)
    };

    GstBreakdown {
        cgst: round_money(cgst),
        sgst: round_money(sgst),
        igst: round_money(igst),
        total_gst: round_money(cgst + sgst + igst),
        total_amount: round_money(taxable_amount + cgst + sgst + igst),
        is_intra_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> JurisdictionCode {
        s.parse().unwrap()
    }

    #[test]
    fn intra_state_splits_into_cgst_and_sgst() {
        let gst = calculate_gst(code("29"), code("29"), dec!(18), dec!(1000));
        assert_eq!(
            gst,
            GstBreakdown {
                cgst: dec!(90),
                sgst: dec!(90),
                igst: dec!(0),
                total_gst: dec!(180),
                total_amount: dec!(1180),
                is_intra_state: true,
            }
        );
    }

    #[test]
    fn inter_state_charges_igst() {
        let gst = calculate_gst(code("29"), code("27"), dec!(18), dec!(1000));
        assert_eq!(
            gst,
            GstBreakdown {
                cgst: dec!(0),
                sgst: dec!(0),
                igst: dec!(180),
                total_gst: dec!(180),
                total_amount: dec!(1180),
                is_intra_state: false,
            }
        );
    }

    #[test]
    fn zero_amount_is_all_zero() {
        let gst = calculate_gst(code("29"), code("29"), dec!(18), dec!(0));
        assert!(gst.cgst.is_zero());
        assert!(gst.sgst.is_zero());
        assert!(gst.igst.is_zero());
        assert!(gst.total_gst.is_zero());
        assert!(gst.total_amount.is_zero());
    }

    #[test]
    fn components_round_to_paise() {
        // 333.33 * 6% = 19.9998
        let gst = calculate_gst(code("29"), code("29"), dec!(12), dec!(333.33));
        assert_eq!(gst.cgst, dec!(20.00));
        assert_eq!(gst.sgst, dec!(20.00));
        assert_eq!(gst.total_gst, dec!(40.00));
        assert_eq!(gst.total_amount, dec!(373.33));
    }

    #[test]
    fn midpoint_rounds_half_up() {
        // 0.25 * 9% = 0.0225 per half, 0.25 * 18% = 0.045 igst
        let intra = calculate_gst(code("29"), code("29"), dec!(18), dec!(0.25));
        assert_eq!(intra.cgst, dec!(0.02));
        let inter = calculate_gst(code("29"), code("27"), dec!(18), dec!(0.25));
        assert_eq!(inter.igst, dec!(0.05));

        // negative midpoints go toward positive infinity
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.12));
        assert_eq!(round_money(dec!(-2.505)), dec!(-2.50));
        assert_eq!(round_money(dec!(-0.126)), dec!(-0.13));
        let refund = calculate_gst(code("29"), code("27"), dec!(18), dec!(-0.25));
        assert_eq!(refund.igst, dec!(-0.04));
    }

    #[test]
    fn money_always_has_two_decimal_places() {
        assert_eq!(round_money(dec!(180)).to_string(), "180.00");
        assert_eq!(round_money(dec!(19.9998)).to_string(), "20.00");
        assert_eq!(round_money(dec!(-0.001)).scale(), 2);

        let gst = calculate_gst(code("29"), code("27"), dec!(18), dec!(1000));
        let json = serde_json::to_value(gst).unwrap();
        assert_eq!(json["igst"], "180.00");
        assert_eq!(json["cgst"], "0.00");
        assert_eq!(json["sgst"], "0.00");
        assert_eq!(json["totalGst"], "180.00");
        assert_eq!(json["totalAmount"], "1180.00");
    }

    #[test]
    fn bounds_reject_amounts_and_rates_that_could_overflow() {
        assert_eq!(checked_amount(MAX_AMOUNT), Ok(MAX_AMOUNT));
        assert_eq!(checked_amount(-MAX_AMOUNT), Ok(-MAX_AMOUNT));
        let huge = dec!(10000000000000000000000000000);
        assert_eq!(
            checked_amount(huge),
            Err(AmountError::AmountOutOfRange(huge))
        );
        assert_eq!(checked_rate(dec!(28)), Ok(dec!(28)));
        assert_eq!(
            checked_rate(dec!(-150)),
            Err(AmountError::RateOutOfRange(dec!(-150)))
        );

        // the extremes the bounds allow still price cleanly
        for (company, counterparty) in [(code("29"), code("29")), (code("29"), code("27"))] {
            let gst = calculate_gst(company, counterparty, MAX_RATE, MAX_AMOUNT);
            assert_eq!(gst.total_gst, MAX_AMOUNT);
            assert_eq!(gst.total_amount, MAX_AMOUNT * dec!(2));
            let gst = calculate_gst(company, counterparty, -MAX_RATE, -MAX_AMOUNT);
            assert_eq!(gst.total_gst, MAX_AMOUNT);
        }
    }

    #[test]
    fn components_are_rounded_before_summing() {
        // each half is 0.0135 -> 0.01, so the total is 0.02 rather than round(0.027) = 0.03
        let gst = calculate_gst(code("29"), code("29"), dec!(18), dec!(0.15));
        assert_eq!(gst.cgst, dec!(0.01));
        assert_eq!(gst.total_gst, dec!(0.02));
        assert_eq!(gst.total_amount, dec!(0.17));
    }

    #[test]
    fn string_and_numeric_codes_compare_equal() {
        let numeric: JurisdictionCode = serde_json::from_str("29").unwrap();
        let gst = calculate_gst(code("29"), numeric, dec!(18), dec!(100));
        assert!(gst.is_intra_state);
    }

    #[test]
    fn negative_amount_propagates() {
        let gst = calculate_gst(code("29"), code("27"), dec!(18), dec!(-100));
        assert_eq!(gst.igst, dec!(-18));
        assert_eq!(gst.total_amount, dec!(-118));
    }

    #[test]
    fn breakdown_properties_hold() {
        let amounts = [
            dec!(0),
            dec!(0.01),
            dec!(1),
            dec!(99.99),
            dec!(333.33),
            dec!(1234.56),
            dec!(100000),
            dec!(98765.43),
        ];
        let rates = [dec!(0), dec!(0.25), dec!(3), dec!(5), dec!(12), dec!(18), dec!(28)];
        let pairs = [(code("29"), code("29")), (code("29"), code("27"))];

        for amount in amounts {
            for rate in rates {
                for (company, counterparty) in pairs {
                    let gst = calculate_gst(company, counterparty, rate, amount);

                    // exclusivity
                    if gst.is_intra_state {
                        assert!(gst.igst.is_zero());
                        // split symmetry
                        assert_eq!(gst.cgst, gst.sgst);
                    } else {
                        assert!(gst.cgst.is_zero() && gst.sgst.is_zero());
                    }

                    // conservation
                    assert_eq!(gst.total_gst, round_money(gst.cgst + gst.sgst + gst.igst));
                    assert_eq!(gst.total_amount, round_money(amount + gst.total_gst));

                    for value in [gst.cgst, gst.sgst, gst.igst, gst.total_gst, gst.total_amount] {
                        assert_eq!(value.scale(), 2, "{value} is not at 2dp");
                    }
                }
            }
        }
    }

    #[test]
    fn doubling_rate_doubles_tax() {
        for amount in [dec!(1000), dec!(250), dec!(1234)] {
            for (company, counterparty) in [(code("29"), code("29")), (code("29"), code("27"))] {
                let single = calculate_gst(company, counterparty, dec!(9), amount);
                let double = calculate_gst(company, counterparty, dec!(18), amount);
                let drift = (double.total_gst - single.total_gst * dec!(2)).abs();
                assert!(drift <= dec!(0.01), "drift {drift} for {amount}");
            }
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let gst = calculate_gst(code("29"), code("27"), dec!(18), dec!(1000));
        let json = serde_json::to_value(gst).unwrap();
        assert!(json.get("totalGst").is_some());
        assert!(json.get("totalAmount").is_some());
        assert_eq!(json["isIntraState"], serde_json::Value::Bool(false));
    }
}
