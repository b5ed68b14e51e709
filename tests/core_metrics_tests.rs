use deimap::core::metrics::{
    mean, population_std, quantile, simpson_diversity, sorted_finite, whiskers,
};

#[test]
fn test_mean_empty_is_none() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[f64::NAN, f64::NAN]), None);
}

#[test]
fn test_mean_skips_nan() {
    assert_eq!(mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
}

#[test]
fn test_quantile_five_values() {
    let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(quantile(&sorted, 0.25), Some(2.0));
    assert_eq!(quantile(&sorted, 0.5), Some(3.0));
    assert_eq!(quantile(&sorted, 0.75), Some(4.0));
}

#[test]
fn test_quantile_interpolates() {
    let sorted = [1.0, 2.0, 3.0, 4.0];
    // h = 3 * 0.25 = 0.75 -> between 1.0 and 2.0
    assert_eq!(quantile(&sorted, 0.25), Some(1.75));
    assert_eq!(quantile(&sorted, 0.5), Some(2.5));
}

#[test]
fn test_quantile_bounds() {
    let sorted = [1.0, 2.0, 3.0];
    assert_eq!(quantile(&sorted, 0.0), Some(1.0));
    assert_eq!(quantile(&sorted, 1.0), Some(3.0));
    assert_eq!(quantile(&sorted, -0.5), Some(1.0));
    assert_eq!(quantile(&[], 0.5), None);
}

#[test]
fn test_quantile_singleton() {
    assert_eq!(quantile(&[7.0], 0.25), Some(7.0));
    assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
}

#[test]
fn test_population_std() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let std = population_std(&values).unwrap();
    assert!((std - 2.0_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_population_std_constant_is_zero() {
    assert_eq!(population_std(&[3.0, 3.0, 3.0]), Some(0.0));
    assert_eq!(population_std(&[]), None);
}

#[test]
fn test_whiskers_clamp_to_extrema() {
    let (lower, upper) = whiskers(1.0, 5.0, 2.0, 4.0);
    assert_eq!(lower, 1.0);
    assert_eq!(upper, 5.0);

    let (lower, upper) = whiskers(-100.0, 100.0, 2.0, 4.0);
    assert_eq!(lower, -1.0);
    assert_eq!(upper, 7.0);
}

#[test]
fn test_simpson_single_category_is_zero() {
    assert_eq!(simpson_diversity(&[10]), 0.0);
    assert_eq!(simpson_diversity(&[]), 0.0);
}

#[test]
fn test_simpson_even_split() {
    assert!((simpson_diversity(&[10, 10]) - 0.5).abs() < 1e-12);
}

#[test]
fn test_simpson_grows_with_categories_but_stays_below_one() {
    let two = simpson_diversity(&[5, 5]);
    let four = simpson_diversity(&[5, 5, 5, 5]);
    let ten = simpson_diversity(&[5; 10]);
    assert!(two < four && four < ten);
    assert!(ten < 1.0);
}

#[test]
fn test_sorted_finite_drops_nan() {
    let sorted = sorted_finite(&[3.0, f64::NAN, 1.0, 2.0]);
    assert_eq!(sorted, vec![1.0, 2.0, 3.0]);
}
