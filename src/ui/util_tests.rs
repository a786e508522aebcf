#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(4.5)), "$4.50");
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.99)), "-$42.99");
    assert_eq!(format_amount(dec!(-1000)), "-$1,000.00");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello world", 5), "hell…");
    assert_eq!(truncate("", 5), "");
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("日本語のテキスト", 4), "日本語…");
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0.0, 4), "[░░░░]");
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    assert_eq!(progress_bar(1.0, 4), "[████]");
    // Over-budget ratios clamp to a full bar
    assert_eq!(progress_bar(2.5, 4), "[████]");
}

#[test]
fn test_usage_ratio() {
    assert_eq!(usage_ratio(dec!(50), dec!(100)), 0.5);
    assert_eq!(usage_ratio(dec!(200), dec!(100)), 1.0);
    assert_eq!(usage_ratio(dec!(10), Decimal::ZERO), 0.0);
    assert_eq!(usage_ratio(Decimal::ZERO, dec!(100)), 0.0);
}

#[test]
fn test_scroll_down_and_up() {
    let (mut index, mut scroll) = (0usize, 0usize);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (1, 0));
    scroll_down(&mut index, &mut scroll, 10, 3);
    scroll_down(&mut index, &mut scroll, 10, 3);
    // Cursor moved past the page; scroll follows
    assert_eq!((index, scroll), (3, 1));

    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1usize, 0usize);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!((index, scroll), (1, 0));
}

#[test]
fn test_scroll_jump() {
    let (mut index, mut scroll) = (7usize, 5usize);
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));

    // Empty list leaves the cursor alone
    let (mut index, mut scroll) = (0usize, 0usize);
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (0, 0));
}
