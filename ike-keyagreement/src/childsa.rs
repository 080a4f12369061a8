//! Child SA Key Derivation: expansion of the parent IKE SA's `Prf_d` over a
//! nonce seed into the four directional keys that bind a Child SA (RFC 7296
//! §2.17, non-PFS case).

use ike_transforms::params::ProtocolId;
use ike_transforms::{
    DiffieHellmanGroup, EncryptionAlgorithm, ExtendedSequenceNumbers, IntegrityAlgorithm, Proposal,
    Transform,
};
use tracing::instrument;
use zeroize::Zeroize;

use crate::encr;
use crate::error::KeyAgreementError;
use crate::ikesa::IkeSaKey;
use crate::integ::Integ;
use crate::prf::prf_plus;

const OPERATION: &str = "generate_key_for_child_sa";

/// The four directional keys (and metadata) that bind a Child SA.
///
/// Dropping a bundle zeroizes every key buffer.
pub struct ChildSaKey {
    /// Security Parameter Index for this Child SA
    pub spi: u32,
    /// DH group used for Perfect Forward Secrecy, if negotiated
    pub dh_info: Option<DiffieHellmanGroup>,
    /// Encryption algorithm (kernel variant: metadata only, no cipher object)
    pub encr_info: (EncryptionAlgorithm, Option<u16>),
    /// Integrity algorithm, absent when the ENCR algorithm is AEAD
    pub integ_info: Option<IntegrityAlgorithm>,
    /// Extended Sequence Numbers indicator
    pub esn_info: ExtendedSequenceNumbers,

    /// Initiator-to-responder encryption key
    pub initiator_to_responder_encryption_key: Vec<u8>,
    /// Responder-to-initiator encryption key
    pub responder_to_initiator_encryption_key: Vec<u8>,
    /// Initiator-to-responder integrity key, empty if `integ_info` is absent
    pub initiator_to_responder_integrity_key: Vec<u8>,
    /// Responder-to-initiator integrity key, empty if `integ_info` is absent
    pub responder_to_initiator_integrity_key: Vec<u8>,
}

impl Drop for ChildSaKey {
    fn drop(&mut self) {
        self.initiator_to_responder_encryption_key.zeroize();
        self.responder_to_initiator_encryption_key.zeroize();
        self.initiator_to_responder_integrity_key.zeroize();
        self.responder_to_initiator_integrity_key.zeroize();
    }
}

impl ChildSaKey {
    /// Construct an un-keyed Child SA descriptor; call
    /// [`generate_key_for_child_sa`] to populate its directional keys.
    pub fn new_empty(
        spi: u32,
        dh_info: Option<DiffieHellmanGroup>,
        encr_info: (EncryptionAlgorithm, Option<u16>),
        integ_info: Option<IntegrityAlgorithm>,
        esn_info: ExtendedSequenceNumbers,
    ) -> Self {
        Self {
            spi,
            dh_info,
            encr_info,
            integ_info,
            esn_info,
            initiator_to_responder_encryption_key: Vec::new(),
            responder_to_initiator_encryption_key: Vec::new(),
            initiator_to_responder_integrity_key: Vec::new(),
            responder_to_initiator_integrity_key: Vec::new(),
        }
    }

    /// Re-encode this Child SA's transforms (ENCR, INTEG, ESN, and DH when
    /// PFS is negotiated) into a wire-shaped Proposal carrying protocol ID
    /// ESP.
    pub fn to_proposal(&self) -> Result<Proposal, KeyAgreementError> {
        let mut proposal = Proposal::new_empty(ProtocolId::Esp, None);
        let mut transforms = vec![
            Transform::Encryption(self.encr_info.0, self.encr_info.1),
            Transform::ExtendedSequenceNumbers(self.esn_info),
        ];
        if let Some(integ) = self.integ_info {
            transforms.push(Transform::Integrity(integ));
        }
        if let Some(dh) = self.dh_info {
            transforms.push(Transform::DiffieHellman(dh));
        }
        proposal.add(transforms);
        proposal.build(1, true).map_err(|_| KeyAgreementError::EncodingFailure {
            operation: "to_proposal",
            transform_id: self.encr_info.0.transform_id(),
        })?;
        Ok(proposal)
    }
}

/// Expand the parent IKE SA's `Prf_d` over `concatenated_nonces` and
/// populate `child_sa`'s four directional keys in place (RFC 7296 §2.17,
/// non-PFS case — no DH material is mixed into the seed).
#[instrument(skip(parent_ike_sa_key, child_sa, concatenated_nonces))]
pub fn generate_key_for_child_sa(
    parent_ike_sa_key: &IkeSaKey,
    child_sa: &mut ChildSaKey,
    concatenated_nonces: &[u8],
) -> Result<(), KeyAgreementError> {
    let encr_key_len =
        encr::key_length(child_sa.encr_info.0, child_sa.encr_info.1).ok_or(
            KeyAgreementError::MissingField {
                operation: OPERATION,
                field: "encr_info.key_length",
            },
        )?;
    let integ_key_len = child_sa.integ_info.map(Integ::key_length).unwrap_or(0);

    let total_key_length = 2 * (encr_key_len + integ_key_len);
    let stream = prf_plus(&parent_ike_sa_key.prf_d, concatenated_nonces, total_key_length)?;

    let mut offset = 0usize;
    let i2r_encr = stream[offset..offset + encr_key_len].to_vec();
    offset += encr_key_len;
    let i2r_integ = stream[offset..offset + integ_key_len].to_vec();
    offset += integ_key_len;
    let r2i_encr = stream[offset..offset + encr_key_len].to_vec();
    offset += encr_key_len;
    let r2i_integ = stream[offset..offset + integ_key_len].to_vec();
    offset += integ_key_len;
    debug_assert_eq!(offset, total_key_length);

    tracing::debug!(
        spi = child_sa.spi,
        total_key_length,
        encr = ?child_sa.encr_info.0,
        integ = ?child_sa.integ_info,
        "derived Child SA key bundle"
    );

    child_sa.initiator_to_responder_encryption_key = i2r_encr;
    child_sa.initiator_to_responder_integrity_key = i2r_integ;
    child_sa.responder_to_initiator_encryption_key = r2i_encr;
    child_sa.responder_to_initiator_integrity_key = r2i_integ;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dh::DhGroup;
    use ike_transforms::{DiffieHellmanGroup, PseudoRandomFunction};

    /// S5 — Child SA slicing with encrKeyLen=32, integKeyLen=20.
    #[test]
    fn child_sa_slicing_order() {
        let encr_key_len = 32usize;
        let integ_key_len = 20usize;
        let total = 2 * (encr_key_len + integ_key_len);
        assert_eq!(total, 104);

        let stream: Vec<u8> = (0..total as u32).map(|i| (i % 256) as u8).collect();
        let mut offset = 0usize;
        let i2r_encr = &stream[offset..offset + encr_key_len];
        offset += encr_key_len;
        let i2r_integ = &stream[offset..offset + integ_key_len];
        offset += integ_key_len;
        let r2i_encr = &stream[offset..offset + encr_key_len];
        offset += encr_key_len;
        let r2i_integ = &stream[offset..offset + integ_key_len];
        offset += integ_key_len;

        assert_eq!(offset, 104);
        assert_eq!(i2r_encr, &stream[0..32]);
        assert_eq!(i2r_integ, &stream[32..52]);
        assert_eq!(r2i_encr, &stream[52..84]);
        assert_eq!(r2i_integ, &stream[84..104]);
    }

    #[test]
    fn derives_child_sa_keys_from_parent() {
        use ike_transforms::params::ProtocolId;

        let mut parent_proposal = Proposal::new_empty(ProtocolId::Ike, None);
        parent_proposal.add(vec![
            Transform::DiffieHellman(DiffieHellmanGroup::Modp1024),
            Transform::Encryption(EncryptionAlgorithm::AesCbc, Some(256)),
            Transform::Integrity(IntegrityAlgorithm::HmacSha2_256_128),
            Transform::PseudoRandomFunction(PseudoRandomFunction::HmacSha1),
        ]);
        let peer_secret = num_bigint::BigUint::from(7u8);
        let peer_public =
            crate::dh::group_for(DiffieHellmanGroup::Modp1024).public_value(&peer_secret);
        let (parent, _) = crate::ikesa::new_ike_sa_key(
            Some(&parent_proposal),
            &peer_public,
            &[0x02u8; 32],
            3,
            4,
        )
        .unwrap();

        let mut child = ChildSaKey::new_empty(
            0x1234,
            None,
            (EncryptionAlgorithm::AesCbc, Some(128)),
            Some(IntegrityAlgorithm::HmacSha1_96),
            ExtendedSequenceNumbers::NoEsn,
        );

        generate_key_for_child_sa(&parent, &mut child, &[0x03u8; 32]).unwrap();

        assert_eq!(child.initiator_to_responder_encryption_key.len(), 16);
        assert_eq!(child.initiator_to_responder_integrity_key.len(), 20);
        assert_eq!(child.responder_to_initiator_encryption_key.len(), 16);
        assert_eq!(child.responder_to_initiator_integrity_key.len(), 20);
        assert_ne!(
            child.initiator_to_responder_encryption_key,
            child.responder_to_initiator_encryption_key
        );
    }
}
