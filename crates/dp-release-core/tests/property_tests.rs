//! Property-based tests for masking, noise and classification

use dp_release_core::classifier::{MASKED_COLUMNS, PASSTHROUGH_COLUMNS};
use dp_release_core::{
    Category, Column, ColumnClassifier, Disposition, MaskFormat, NoiseInjector, Sensitivity,
    StructuredMasker, Value,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn national_id_keeps_only_last_four(id in "[0-9]{4,16}") {
        let masked = StructuredMasker::mask_str(&id, MaskFormat::NationalId).unwrap();

        prop_assert_eq!(masked.chars().count(), 16);
        prop_assert!(masked.starts_with("************"));
        prop_assert_eq!(&masked[12..], &id[id.len() - 4..]);
        prop_assert_ne!(masked, id);
    }

    #[test]
    fn short_national_id_unchanged(id in "[0-9]{0,3}") {
        prop_assert_eq!(StructuredMasker::mask_str(&id, MaskFormat::NationalId), None);
        prop_assert_eq!(
            StructuredMasker::mask_value(&Value::text(id.clone()), MaskFormat::NationalId),
            Value::text(id)
        );
    }

    #[test]
    fn phone_keeps_ends(phone in "[0-9]{10,15}") {
        let masked = StructuredMasker::mask_str(&phone, MaskFormat::Phone).unwrap();

        prop_assert_eq!(masked.len(), 10);
        prop_assert_eq!(&masked[..2], &phone[..2]);
        prop_assert_eq!(&masked[2..8], "******");
        prop_assert_eq!(&masked[8..], &phone[phone.len() - 2..]);
    }

    #[test]
    fn email_domain_preserved(
        local in "[a-z0-9._]{1,20}",
        domain in "[a-z0-9-]{1,12}\\.[a-z]{2,4}",
    ) {
        let email = format!("{}@{}", local, domain);
        let masked = StructuredMasker::mask_str(&email, MaskFormat::Email).unwrap();

        let (masked_local, masked_domain) = masked.split_once('@').unwrap();
        prop_assert_eq!(masked_domain, domain.as_str());
        prop_assert!(masked_local.starts_with("*********"));
        prop_assert!(local.ends_with(&masked_local[9..]));
        prop_assert!(masked_local.len() <= 13);
    }

    #[test]
    fn masking_never_touches_nulls(format in prop_oneof![
        Just(MaskFormat::NationalId),
        Just(MaskFormat::Phone),
        Just(MaskFormat::Email),
    ]) {
        prop_assert_eq!(StructuredMasker::mask_value(&Value::Null, format), Value::Null);
    }

    #[test]
    fn degenerate_sensitivity_is_identity(
        values in prop::collection::vec(-1e6f64..1e6, 1..50),
        epsilon in 0.01f64..10.0,
        seed in any::<u64>(),
    ) {
        let injector = NoiseInjector::laplace(epsilon).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let out = injector
            .perturb_all(&values, Sensitivity::new(0.0).unwrap(), &mut rng)
            .unwrap();

        prop_assert_eq!(out, values);
    }

    #[test]
    fn noise_preserves_length_and_finiteness(
        values in prop::collection::vec(-1e3f64..1e3, 0..50),
        sensitivity in 0.1f64..100.0,
        seed in any::<u64>(),
    ) {
        let injector = NoiseInjector::laplace(1.0).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let out = injector
            .perturb_all(&values, Sensitivity::new(sensitivity).unwrap(), &mut rng)
            .unwrap();

        prop_assert_eq!(out.len(), values.len());
        prop_assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn classification_follows_name_then_cell_types(
        values in prop::collection::vec(prop_oneof![
            Just(Value::Null),
            (-1e3f64..1e3).prop_map(Value::Number),
            "[a-z]{1,8}".prop_map(Value::Text),
        ], 0..20),
    ) {
        let numeric = values.iter().all(|v| !matches!(v, Value::Text(_)));

        for (name, format) in MASKED_COLUMNS {
            let column = Column::new(*name, values.clone());
            prop_assert_eq!(ColumnClassifier::classify(&column), Disposition::Mask(*format));
        }

        for name in PASSTHROUGH_COLUMNS {
            let column = Column::new(*name, values.clone());
            prop_assert_eq!(ColumnClassifier::classify(&column), Disposition::Passthrough);
        }

        for category in Category::ALL {
            for name in category.columns() {
                if ColumnClassifier::mask_format(name).is_some()
                    || ColumnClassifier::is_designated_passthrough(name)
                {
                    continue;
                }
                let expected = if numeric { Disposition::Noise } else { Disposition::Passthrough };
                let column = Column::new(*name, values.clone());
                prop_assert_eq!(ColumnClassifier::classify(&column), expected);
            }
        }
    }
}
