/// Shorthand for creating a rational number.
///
/// A single argument is converted exactly from its floating point value, two arguments are the
/// numerator and denominator.
#[macro_export]
macro_rules! RQ {
    ($value:expr) => {
        $crate::data::number_types::rational::Rational::from_f64($value as f64).unwrap()
    };
    ($numer:expr, $denom:expr) => {
        $crate::data::number_types::rational::Rational::new($numer, $denom)
    };
}
