use rustfft::{FftPlanner, num_complex::Complex};
use crate::features::FeatureSink;
use crate::features::naming::Param;

const FFT_COEFFICIENTS: usize = 100;

/// Forward FFT of a real series, keeping the non-negative frequencies `0..=n/2`.
fn real_spectrum(x: &[f64]) -> Vec<Complex<f64>> {
    if x.is_empty() {
        return Vec::new();
    }
    let mut buffer = x.iter()
        .map(|v| Complex::new(*v, 0.0))
        .collect::<Vec<_>>();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer.truncate(x.len() / 2 + 1);
    buffer
}

pub fn fft_coefficient(x: &[f64], sink: &mut FeatureSink) {
    let spectrum = real_spectrum(x);
    let attributes: [(&str, fn(&Complex<f64>) -> f64); 4] = [
        ("real", |c: &Complex<f64>| c.re),
        ("imag", |c: &Complex<f64>| c.im),
        ("abs", |c: &Complex<f64>| c.norm()),
        ("angle", |c: &Complex<f64>| c.arg().to_degrees()),
    ];
    for (attr, extract) in attributes {
        for coeff in 0..FFT_COEFFICIENTS {
            let value = spectrum.get(coeff).map(extract).unwrap_or(f64::NAN);
            sink.emit("fft_coefficient",
                      &[("attr", Param::Str(attr)), ("coeff", Param::Int(coeff as i64))],
                      value);
        }
    }
}

/// Centroid, variance, skew and kurtosis of the absolute spectrum,
/// treated as a distribution over frequency index.
pub fn fft_aggregated(x: &[f64], sink: &mut FeatureSink) {
    let magnitudes = real_spectrum(x).iter().map(|c| c.norm()).collect::<Vec<_>>();
    let total = magnitudes.iter().sum::<f64>();
    let moment = |order: i32| {
        magnitudes.iter()
            .enumerate()
            .map(|(i, m)| m * (i as f64).powi(order))
            .sum::<f64>() / total
    };
    let centroid = moment(1);
    let variance = moment(2) - centroid.powi(2);
    let skew = if variance < 0.5 {
        f64::NAN
    } else {
        (moment(3) - 3.0 * centroid * variance - centroid.powi(3)) / variance.powf(1.5)
    };
    let kurtosis = if variance < 0.5 {
        f64::NAN
    } else {
        (moment(4) - 4.0 * centroid * moment(3) + 6.0 * moment(2) * centroid.powi(2) - 3.0 * centroid)
            / variance.powi(2)
    };
    for (aggtype, value) in [("centroid", centroid), ("variance", variance), ("skew", skew), ("kurtosis", kurtosis)] {
        sink.emit("fft_aggregated", &[("aggtype", Param::Str(aggtype))], value);
    }
}
