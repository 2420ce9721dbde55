use num::{One, Zero};

use crate::data::number_types::rational::Rational;
use crate::RQ;

#[test]
fn field_identities() {
    for i in 1..10 {
        assert_eq!(RQ!(0, i), Rational::zero());
        assert_eq!(RQ!(i, i), Rational::one());
        assert_eq!(RQ!(-i, -i), Rational::one());
    }
}

#[test]
#[should_panic]
fn panic_divide_by_zero() {
    let _result = RQ!(3, 0);
}

#[test]
fn eq() {
    assert_eq!(RQ!(3, 2), RQ!(6, 4));
    assert_eq!(RQ!(0, 2), RQ!(0));
    assert_eq!(RQ!(0.25), RQ!(1, 4));
}

#[test]
fn arithmetic() {
    assert_eq!(RQ!(3, 2) + RQ!(6, 4), RQ!(3));
    assert_eq!(&RQ!(3, 2) - &RQ!(1, 2), RQ!(1));
    assert_eq!(RQ!(2, 3) * &RQ!(3, 4), RQ!(1, 2));
    assert_eq!(RQ!(1, 2) / RQ!(1, 4), RQ!(2));
    assert_eq!(-&RQ!(1, 3), RQ!(-1, 3));

    let mut x = RQ!(0);
    for _ in 0..1000 {
        x += RQ!(1, 1000);
    }
    assert_eq!(x, RQ!(1));
    assert_eq!([RQ!(1, 2), RQ!(1, 3), RQ!(1, 6)].iter().sum::<Rational>(), RQ!(1));
}

#[test]
fn rounding_to_integers() {
    assert_eq!(RQ!(3, 10).ceil(), RQ!(1));
    assert_eq!(RQ!(3, 10).floor(), RQ!(0));
    assert_eq!(RQ!(-3, 10).ceil(), RQ!(0));
    assert_eq!(RQ!(-3, 10).floor(), RQ!(-1));
    assert_eq!(RQ!(4).floor(), RQ!(4));
    assert_eq!(RQ!(4).ceil(), RQ!(4));
}

#[test]
fn integrality() {
    assert!(RQ!(6, 3).is_integer());
    assert!(RQ!(-5).is_integer());
    assert!(!RQ!(1, 3).is_integer());
    assert!(!RQ!(0.5).is_integer());
}

#[test]
fn parts() {
    assert_eq!(RQ!(-2, 3).abs(), RQ!(2, 3));
    assert_eq!("-7/21".parse::<Rational>().unwrap(), RQ!(-1, 3));
    assert_eq!(Rational::power_of_ten(3), RQ!(1000));
}
