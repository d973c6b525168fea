//! Spend detection: which inputs of a transaction consume key images the wallet already holds.

use std::collections::HashSet;

use scanbridge_core::base::KeyImage;
use scanbridge_wire::blob::TxIn;

/// Key images of `inputs` that the caller already knows, in input order.
#[must_use]
pub fn match_spends(inputs: &[TxIn], known: &HashSet<KeyImage>) -> Vec<KeyImage> {
    inputs
        .iter()
        .filter_map(|input| match input {
            TxIn::ToKey { k_image, .. } => Some(KeyImage::new(k_image.image.0)),
            TxIn::Gen { .. } => None,
        })
        .filter(|image| known.contains(image))
        .collect()
}

#[cfg(test)]
mod tests {
    use scanbridge_wire::blob::{Hash, KeyImage as InputImage, VarInt};

    use super::*;

    fn input(byte: u8) -> TxIn {
        TxIn::ToKey {
            amount: VarInt(0),
            key_offsets: vec![VarInt(1), VarInt(2)],
            k_image: InputImage {
                image: Hash([byte; 32]),
            },
        }
    }

    #[test]
    fn keeps_known_images_in_input_order() {
        let inputs = [input(3), TxIn::Gen { height: VarInt(1) }, input(1), input(2)];
        let known = HashSet::from([KeyImage::new([1; 32]), KeyImage::new([3; 32])]);
        assert_eq!(
            match_spends(&inputs, &known),
            vec![KeyImage::new([3; 32]), KeyImage::new([1; 32])]
        );
    }

    #[test]
    fn empty_set_matches_nothing() {
        assert!(match_spends(&[input(1)], &HashSet::new()).is_empty());
    }
}
