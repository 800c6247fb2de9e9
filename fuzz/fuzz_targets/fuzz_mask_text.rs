#![no_main]

use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use sqlguard::masking::{mask_text, MaskingMethod};

#[derive(Debug)]
struct MaskInput {
    method: String,
    pattern: String,
    value: String,
}

impl<'a> Arbitrary<'a> for MaskInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> libfuzzer_sys::arbitrary::Result<Self> {
        let method = u
            .choose(&["fixed_char", "hide_middle", "keep_prefix", "keep_suffix", "other"])?
            .to_string();
        Ok(Self {
            method,
            pattern: u.arbitrary()?,
            value: u.arbitrary()?,
        })
    }
}

fuzz_target!(|input: MaskInput| {
    let method = MaskingMethod::from(input.method.as_str());
    let masked = mask_text(&method, &input.pattern, &input.value);

    // Partial masks keep the character count of the input
    let len = input.value.chars().count();
    match method {
        MaskingMethod::HideMiddle if len >= 3 => assert_eq!(masked.chars().count(), len),
        MaskingMethod::KeepPrefix | MaskingMethod::KeepSuffix if len > 2 => {
            assert_eq!(masked.chars().count(), len)
        }
        _ => {}
    }
});
