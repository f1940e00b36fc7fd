//! Property tests for the frame codec and volume clamping.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use playback::frame::{checksum, Frame};
use playback::{DeviceCommand, Volume};
use proptest::prelude::*;

fn any_command() -> impl Strategy<Value = DeviceCommand> {
    prop_oneof![
        Just(DeviceCommand::Next),
        Just(DeviceCommand::Previous),
        Just(DeviceCommand::Play),
        Just(DeviceCommand::SetVolume),
        Just(DeviceCommand::QuerySource),
        Just(DeviceCommand::Resume),
        Just(DeviceCommand::Pause),
        Just(DeviceCommand::Stop),
        Just(DeviceCommand::TrackCountUDisk),
        Just(DeviceCommand::TrackCountTf),
    ]
}

proptest::proptest! {
    /// Body sum plus checksum is zero modulo 2^16 for every frame.
    #[test]
    fn checksum_negates_body(body in proptest::array::uniform6(any::<u8>())) {
        let sum = body.iter().fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
        prop_assert_eq!(sum.wrapping_add(checksum(&body)), 0);
    }

    /// Encoded frames carry fixed markers and decode back to themselves.
    #[test]
    fn encoded_frames_are_well_formed(cmd in any_command(), param in any::<u16>()) {
        let frame = Frame::new(cmd, param);
        let bytes = frame.as_bytes();
        prop_assert_eq!(bytes[0], 0x7E);
        prop_assert_eq!(bytes[1], 0xFF);
        prop_assert_eq!(bytes[2], 0x06);
        prop_assert_eq!(bytes[4], 0x00);
        prop_assert_eq!(bytes[9], 0xEF);
        prop_assert_eq!(Frame::decode(bytes).unwrap(), frame);
    }

    /// Flipping any single body bit is caught on decode.
    #[test]
    fn single_bit_corruption_detected(param in any::<u16>(), idx in 3usize..7, bit in 0u8..8) {
        let mut raw = *Frame::new(DeviceCommand::SetVolume, param).as_bytes();
        raw[idx] ^= 1 << bit;
        prop_assert!(Frame::decode(&raw).is_err());
    }

    /// Any request lands inside 0..=30 and in-range requests are kept.
    #[test]
    fn volume_always_in_range(level in any::<i32>()) {
        let v = Volume::from_request(level).get();
        prop_assert!(v <= 30);
        if (0..=30).contains(&level) {
            prop_assert_eq!(i32::from(v), level);
        }
    }
}
