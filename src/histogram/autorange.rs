use crate::channels::DisplayWindow;

use super::Histogram;

/// Fraction of histogram mass clipped at each tail by default.
pub const DEFAULT_SATURATION: f64 = 0.01;

/// Updates the allowed range of `window` from an observed histogram.
///
/// Returns `true` when the channel looks 8-bit: it was constructed with a cap
/// of 255 and the histogram holds integers inside `[0, 255]`. Such channels keep 255
/// as their maximum; every other channel takes the observed maximum.
pub fn update_allowed_from_histogram(window: &mut DisplayWindow, histogram: &Histogram) -> bool {
    let probably_8bit = window.initial_max_allowed() == 255.0
        && histogram.is_integer()
        && histogram.min_value() >= 0.0
        && histogram.max_value() <= 255.0;
    let min_allowed = histogram.min_value().min(0.0);
    let max_allowed = if probably_8bit {
        255.0
    } else {
        histogram.max_value()
    };
    window.set_min_max_allowed(min_allowed, max_allowed);
    probably_8bit
}

/// Sets the display window so that `saturation` of the histogram mass is
/// clipped at each end.
///
/// Without a histogram the window is left as is and `false` is returned.
/// A saturation outside `(0, 1)` selects the full histogram range.
pub fn auto_set_display_range(
    window: &mut DisplayWindow,
    histogram: Option<&Histogram>,
    saturation: f64,
) -> bool {
    let Some(histogram) = histogram else {
        return false;
    };
    if !(saturation > 0.0 && saturation < 1.0) {
        window.set_min_display(histogram.edge_min());
        window.set_max_display(histogram.edge_max());
        return true;
    }

    let count_max = if histogram.is_normalized() {
        saturation
    } else {
        histogram.count_sum() * saturation
    };
    let n_bins = histogram.n_bins();

    let mut low = 0;
    let mut acc = 0.0;
    while low < n_bins - 2 {
        acc += histogram.count(low);
        if acc >= count_max {
            break;
        }
        low += 1;
    }

    let mut high = n_bins - 1;
    acc = 0.0;
    while high > 1 {
        acc += histogram.count(high);
        if acc >= count_max {
            break;
        }
        high -= 1;
    }

    let mut min_display = histogram.bin_left_edge(low);
    let mut max_display = histogram.bin_right_edge(high);
    if min_display > max_display {
        std::mem::swap(&mut min_display, &mut max_display);
    }
    window.set_min_display(min_display);
    window.set_max_display(max_display);
    true
}
