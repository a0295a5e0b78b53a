//! 表示用の数値フォーマット
//!
//! ダッシュボードの表示規則（K/M 省略表記、小数点以下の桁数固定、桁区切り）をまとめる。

/// f64 の正確な10進展開に必要な小数部の桁数の上限
const EXACT_FRACTION_DIGITS: usize = 1074;

/// 指定桁で四捨五入する（0.5 はゼロから遠い方向へ丸める）
///
/// `to_fixed` と同じ規則で、二進数としての正確な値を丸める。
pub fn round_to(value: f64, digits: u32) -> f64 {
    to_fixed(value, digits).parse().unwrap_or(value)
}

/// 小数点以下の桁数を固定した文字列に変換
///
/// 丸める前に `value * 10^digits` を計算すると誤差で結果が変わるため、
/// 正確な10進展開の文字列から直接丸める。ちょうど中間の値は絶対値の大きい方へ。
pub fn to_fixed(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits as usize;
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let Some((integer, fraction)) = exact.split_once('.') else {
        return exact;
    };

    let mut kept: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(digits))
        .collect();
    if fraction.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        increment_digits(&mut kept);
    }

    let split = kept.len() - digits;
    let mut fixed = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        fixed.push('-');
    }
    fixed.extend(kept[..split].iter().map(|d| *d as char));
    if digits > 0 {
        fixed.push('.');
        fixed.extend(kept[split..].iter().map(|d| *d as char));
    }
    fixed
}

/// 10進数字列に1を足す（繰り上がりで桁が増えることもある）
fn increment_digits(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// 視聴者数・フォロワー数などの省略表記
///
/// 0 → `"0"`、100万以上 → `"2.5M"`、1000以上 → `"1.5K"`、それ以外はそのまま。
pub fn format_number(num: u64) -> String {
    if num == 0 {
        return "0".to_string();
    }
    if num >= 1_000_000 {
        return format!("{}M", to_fixed(num as f64 / 1_000_000.0, 1));
    }
    if num >= 1_000 {
        return format!("{}K", to_fixed(num as f64 / 1_000.0, 1));
    }
    num.to_string()
}

/// 金額表示（桁区切り + 小数点以下2桁）
///
/// `6362.57` → `"6,362.57"`
pub fn format_currency(amount: f64) -> String {
    let fixed = to_fixed(amount.abs(), 2);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(integer), fraction)
}

/// 整数部の文字列に3桁ごとのカンマを挿入
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
