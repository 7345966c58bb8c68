//! Spin-the-wheel with four equally likely segments.
//!
//! The stake is collected up front; the landed segment's value is what comes back.

use rand::Rng;

use super::GameRng;

/// One resolved spin: the segment label and the amount credited back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WheelSpin {
    pub segment: String,
    pub payout: u64,
}

pub fn spin(stake: u64, rng: &mut GameRng) -> WheelSpin {
    let (segment, payout) = match rng.gen_range(0..4u8) {
        0 => ("100 coins", 100),
        1 => ("50 coins", 50),
        2 => ("Double your spin cost", stake.saturating_mul(2)),
        _ => ("No reward", 0),
    };
    WheelSpin {
        segment: segment.to_string(),
        payout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_segment_lands() {
        let mut seen = [false; 4];
        for stream in 0..200 {
            let mut rng = GameRng::new(&[6u8; 32], stream, 0);
            match spin(30, &mut rng) {
                WheelSpin { payout: 100, .. } => seen[0] = true,
                WheelSpin { payout: 50, .. } => seen[1] = true,
                WheelSpin { payout: 60, .. } => seen[2] = true,
                WheelSpin { payout: 0, .. } => seen[3] = true,
                other => panic!("unexpected segment: {other:?}"),
            }
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_double_segment_scales_with_stake() {
        // Find a stream that lands on the double segment, then replay it with
        // a different stake and confirm the payout tracks the stake.
        for stream in 0..200 {
            let mut rng = GameRng::new(&[6u8; 32], stream, 0);
            let first = spin(10, &mut rng);
            if first.segment == "Double your spin cost" {
                let mut replay = GameRng::new(&[6u8; 32], stream, 0);
                let second = spin(75, &mut replay);
                assert_eq!(second.segment, "Double your spin cost");
                assert_eq!(first.payout, 20);
                assert_eq!(second.payout, 150);
                return;
            }
        }
        panic!("no stream landed on the double segment");
    }
}
