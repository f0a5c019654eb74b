//! Integration Tests for Feature Encoding
//!
//! Tests encoder, vector và layout hoạt động đúng khi kết hợp với nhau.

#[cfg(test)]
mod integration_tests {
    use crate::logic::error::TriageError;
    use crate::logic::features::{
        encode, grid, grid_size, FeatureVector, SignalBand, FEATURE_COUNT,
    };
    use crate::logic::sensor::{Breathing, DebrisCover, HeatSignature, MotionLevel, SensorReading};

    fn responsive() -> SensorReading {
        SensorReading::new(true, MotionLevel::High, HeatSignature::Normal, Breathing::Yes)
    }

    #[test]
    fn test_encode_codes_in_layout_order() {
        let reading = responsive()
            .with_debris(DebrisCover::Partial)
            .with_signal_quality(0.5);

        let vector = encode(&reading).unwrap();
        assert_eq!(vector.values, [1.0, 3.0, 2.0, 2.0, 1.0, 1.0]);
        assert!(vector.validate().is_ok());
        assert_eq!(vector.get(3), Some(2.0));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = encode(&responsive()).unwrap();
        let b = encode(&responsive()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signal_quality_bands() {
        assert_eq!(SignalBand::from_quality(0.0).unwrap(), SignalBand::Poor);
        assert_eq!(SignalBand::from_quality(0.39).unwrap(), SignalBand::Poor);
        assert_eq!(SignalBand::from_quality(0.40).unwrap(), SignalBand::Fair);
        assert_eq!(SignalBand::from_quality(0.75).unwrap(), SignalBand::Good);
        assert_eq!(SignalBand::from_quality(1.0).unwrap(), SignalBand::Good);
    }

    #[test]
    fn test_out_of_domain_quality_is_encoding_error() {
        for bad in [f32::NAN, -0.1, 1.5, f32::INFINITY] {
            let err = encode(&responsive().with_signal_quality(bad)).unwrap_err();
            assert!(matches!(err, TriageError::Encoding { field: "signal_quality", .. }));
        }
    }

    #[test]
    fn test_from_row_rejects_bad_codes() {
        assert!(FeatureVector::from_row(&[1.0, 3.0, 2.0, 2.0, 0.0, 2.0]).is_ok());
        // motion code 4 does not exist
        assert!(FeatureVector::from_row(&[1.0, 4.0, 2.0, 2.0, 0.0, 2.0]).is_err());
        assert!(FeatureVector::from_row(&[0.5, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(matches!(
            FeatureVector::from_row(&[1.0, 0.0]),
            Err(TriageError::ModelSchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_grid_covers_feature_space() {
        let cells = grid();
        assert_eq!(cells.len(), grid_size());
        assert_eq!(cells[0], [0.0; FEATURE_COUNT]);
        assert_eq!(cells[cells.len() - 1], [1.0, 3.0, 3.0, 2.0, 2.0, 2.0]);

        for cell in &cells {
            assert!(FeatureVector::from_row(cell).is_ok());
        }
    }
}
