//! Certificate Authority Matcher: compares a locally stored CA hash against
//! a peer-requested one, restricted to the X.509 signature encoding.

use ike_transforms::params::CertificateEncoding;

/// Returns true iff `encoding` is the X.509 certificate signature encoding,
/// `stored_ca_hash` is non-empty, and the two hashes are byte-identical.
///
/// Any other encoding yields false without comparing the hashes at all.
pub fn compare_root_certificate(
    stored_ca_hash: &[u8],
    encoding: CertificateEncoding,
    requested_hash: &[u8],
) -> bool {
    if encoding != CertificateEncoding::X509CertificateSignature {
        return false;
    }
    !stored_ca_hash.is_empty() && stored_ca_hash == requested_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_identical_hashes() {
        let hash = [0xAAu8; 32];
        assert!(compare_root_certificate(
            &hash,
            CertificateEncoding::X509CertificateSignature,
            &hash
        ));
    }

    #[test]
    fn rejects_empty_stored_hash() {
        assert!(!compare_root_certificate(
            &[],
            CertificateEncoding::X509CertificateSignature,
            &[0xAAu8; 32]
        ));
    }

    #[test]
    fn rejects_mismatched_hashes() {
        assert!(!compare_root_certificate(
            &[0xAAu8; 32],
            CertificateEncoding::X509CertificateSignature,
            &[0xBBu8; 32]
        ));
    }
}
