use proptest::prelude::*;

use crate::{
    gateway::Credentials,
    signature::{SignatureContext, digest, verify_signature},
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_digest_is_deterministic(fields in prop::collection::vec(".*", 0..6)) {
        prop_assert_eq!(digest(&fields), digest(&fields));
    }

    #[test]
    fn test_digest_is_lowercase_hex(fields in prop::collection::vec(".*", 0..6)) {
        let signature = digest(&fields);
        prop_assert_eq!(signature.len(), 128);
        prop_assert!(signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_callback_roundtrip(
        login in "[a-zA-Z0-9_-]{1,20}",
        password1 in "[a-zA-Z0-9]{8,20}",
        password2 in "[a-zA-Z0-9]{8,20}",
        out_sum in "[0-9]{1,6}\\.[0-9]{6}",
        invoice_id in 0i64..i64::MAX,
        uppercase in any::<bool>(),
    ) {
        let credentials = Credentials::new(&login, &password1, &password2);
        let invoice_id = invoice_id.to_string();
        let context = SignatureContext::Callback { out_sum: &out_sum, invoice_id: &invoice_id };
        let mut signature = context.sign(&credentials);
        if uppercase {
            signature = signature.to_uppercase();
        }

        prop_assert!(verify_signature(&signature, &context, &credentials));
    }

    #[test]
    fn test_callback_rejects_other_invoice(
        out_sum in "[0-9]{1,6}",
        invoice_id in 0i64..1_000_000,
        offset in 1i64..1_000,
    ) {
        let credentials = Credentials::new("Shop", "pass1", "pass2");
        let signed_id = invoice_id.to_string();
        let other_id = (invoice_id + offset).to_string();
        let signed = SignatureContext::Callback { out_sum: &out_sum, invoice_id: &signed_id };
        let other = SignatureContext::Callback { out_sum: &out_sum, invoice_id: &other_id };

        prop_assert!(!verify_signature(&signed.sign(&credentials), &other, &credentials));
    }
}
