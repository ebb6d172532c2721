//! Password normalization for keystore KDFs

use std::borrow::Cow;

use bip39::Mnemonic;
use zeroize::Zeroize;

use crate::secure::SecretString;

/// NFKD-normalize a password and drop C0, C1 and DEL control code points
///
/// Two passwords that only differ by Unicode composition or by control
/// characters unlock the same keystore.
pub fn normalize_password(password: &str) -> SecretString {
    let mut cow = Cow::Borrowed(password);
    Mnemonic::normalize_utf8_cow(&mut cow);

    let normalized: String = cow.chars().filter(|c| !is_control(*c)).collect();
    if let Cow::Owned(mut owned) = cow {
        owned.zeroize();
    }
    normalized.into()
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}
