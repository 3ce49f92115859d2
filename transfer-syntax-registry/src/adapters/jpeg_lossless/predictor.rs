//! Sample prediction of the lossless process.

/// A predictor, as chosen by the selection value of the scan header.
///
/// `Ra` is the reconstructed sample to the left,
/// `Rb` the one above, and `Rc` the one above and to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predictor {
    /// selection value 0: no prediction
    NoPrediction,
    /// selection value 1: `Ra`
    Left,
    /// selection value 2: `Rb`
    Above,
    /// selection value 3: `Rc`
    UpperLeft,
    /// selection value 4: `Ra + Rb - Rc`
    Planar,
    /// selection value 5: `Ra + ((Rb - Rc) >> 1)`
    LeftPlanar,
    /// selection value 6: `Rb + ((Ra - Rc) >> 1)`
    AbovePlanar,
    /// selection value 7: `(Ra + Rb) / 2`
    Average,
}

impl Predictor {
    /// Obtain the predictor for a selection value,
    /// or `None` if the value is not in `0..=7`.
    pub fn from_selection_value(value: u8) -> Option<Self> {
        Some(match value {
            0 => Predictor::NoPrediction,
            1 => Predictor::Left,
            2 => Predictor::Above,
            3 => Predictor::UpperLeft,
            4 => Predictor::Planar,
            5 => Predictor::LeftPlanar,
            6 => Predictor::AbovePlanar,
            7 => Predictor::Average,
            _ => return None,
        })
    }

    /// Compute the prediction from the neighbouring samples.
    #[inline]
    pub fn predict(self, ra: i32, rb: i32, rc: i32) -> i32 {
        match self {
            Predictor::NoPrediction => 0,
            Predictor::Left => ra,
            Predictor::Above => rb,
            Predictor::UpperLeft => rc,
            Predictor::Planar => ra + rb - rc,
            Predictor::LeftPlanar => ra + ((rb - rc) >> 1),
            Predictor::AbovePlanar => rb + ((ra - rc) >> 1),
            Predictor::Average => (ra + rb) >> 1,
        }
    }
}

/// Turn `size` additional bits into a signed difference
/// (a magnitude category of 16 stands for 32768 with no additional bits).
#[inline]
pub fn extend(bits: u16, size: u8) -> i32 {
    match size {
        0 => 0,
        16 => 32768,
        _ => {
            let bits = i32::from(bits);
            if bits < 1 << (size - 1) {
                bits - ((1 << size) - 1)
            } else {
                bits
            }
        }
    }
}
