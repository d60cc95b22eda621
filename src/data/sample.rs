//! Demo input: two E. coli cultures read every 30 minutes plus an overnight point.
//!
//! Used as the default text in the TUI and for `growth fit` when no input is
//! given, so a fresh checkout always has something to plot.

use crate::domain::RawSeriesText;

pub const DEMO_TIME: &str = "0,30,60,90,120,150,180, 1440; 0,30,60,90,120,150,180,1440";
pub const DEMO_DENSITY: &str = "0.038, 0.042, 0.066, 0.112, 0.2, 0.3, 0.37, 2.6; \
                                0.062, 0.072, 0.110, 0.184, 0.278, 0.424, 0.516, 2.188";
pub const DEMO_TREND_TIME: &str = "30,60,90,120,150; 30,60,90,120,150";
pub const DEMO_STD_DEV: &str = "0.005,0.01,0.02,0.03,0.04,0.05,0.06,0.07; \
                                0.006,0.012,0.022,0.032,0.042,0.052,0.062,0.072";
pub const DEMO_NAMES: &str = "Sample C (LB + ara + Glu); Sample E (LB)";

/// The demo input as raw text fields.
pub fn demo_input() -> RawSeriesText {
    RawSeriesText {
        time: DEMO_TIME.to_string(),
        density: DEMO_DENSITY.to_string(),
        trend_time: DEMO_TREND_TIME.to_string(),
        std_dev: DEMO_STD_DEV.to_string(),
        names: DEMO_NAMES.to_string(),
    }
}
