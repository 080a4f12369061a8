//! IKE SA Key Agreement: Diffie-Hellman exchange, SKEYSEED, and PRF+
//! expansion into the seven keys that bind an IKE SA (RFC 7296 §1.3, §2.14).

use std::fmt;

use ike_transforms::params::ProtocolId;
use ike_transforms::{
    DiffieHellmanGroup, EncryptionAlgorithm, IntegrityAlgorithm, Proposal, PseudoRandomFunction,
    Transform,
};
use tracing::instrument;
use zeroize::Zeroize;

use crate::dh::{self, DhGroup};
use crate::encr::{self, Encr};
use crate::error::KeyAgreementError;
use crate::integ::Integ;
use crate::prf::{prf_plus, Prf};
use crate::random;

const OPERATION: &str = "new_ike_sa_key";

struct DecodedIkeProposal {
    dh_info: DiffieHellmanGroup,
    encr_info: (EncryptionAlgorithm, Option<u16>),
    integ_info: IntegrityAlgorithm,
    prf_info: PseudoRandomFunction,
}

fn decode_ike_proposal(proposal: &Proposal) -> Result<DecodedIkeProposal, KeyAgreementError> {
    let dh_info = proposal.diffie_hellman_groups.first().copied();
    let encr_info = proposal.encryption_algorithms.first().copied();
    let integ_info = proposal.integrity_algorithms.first().copied();
    let prf_info = proposal.pseudo_random_functions.first().copied();

    // This gate is on integ_info, not encr_info.
    if integ_info.is_none() {
        return Err(KeyAgreementError::MissingField {
            operation: OPERATION,
            field: "integrity_algorithms",
        });
    }

    Ok(DecodedIkeProposal {
        dh_info: dh_info.ok_or(KeyAgreementError::MissingField {
            operation: OPERATION,
            field: "diffie_hellman_groups",
        })?,
        encr_info: encr_info.ok_or(KeyAgreementError::MissingField {
            operation: OPERATION,
            field: "encryption_algorithms",
        })?,
        integ_info: integ_info.ok_or(KeyAgreementError::MissingField {
            operation: OPERATION,
            field: "integrity_algorithms",
        })?,
        prf_info: prf_info.ok_or(KeyAgreementError::MissingField {
            operation: OPERATION,
            field: "pseudo_random_functions",
        })?,
    })
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// The seven keys (and their initialized primitives) that bind one IKE SA,
/// per RFC 7296 §2.14.
///
/// Dropping a bundle zeroizes every `SK_*` buffer.
#[derive(Debug)]
pub struct IkeSaKey {
    /// Selected Diffie-Hellman group
    pub dh_info: DiffieHellmanGroup,
    /// Selected encryption algorithm and, for variable-key ciphers, its key length in bits
    pub encr_info: (EncryptionAlgorithm, Option<u16>),
    /// Selected integrity algorithm
    pub integ_info: IntegrityAlgorithm,
    /// Selected pseudorandom function
    pub prf_info: PseudoRandomFunction,

    /// Key-derivation key for Child SAs
    pub sk_d: Vec<u8>,
    /// Initiator-to-responder integrity key
    pub sk_ai: Vec<u8>,
    /// Responder-to-initiator integrity key
    pub sk_ar: Vec<u8>,
    /// Initiator-to-responder encryption key
    pub sk_ei: Vec<u8>,
    /// Responder-to-initiator encryption key
    pub sk_er: Vec<u8>,
    /// Key used in the initiator's AUTH payload computation
    pub sk_pi: Vec<u8>,
    /// Key used in the responder's AUTH payload computation
    pub sk_pr: Vec<u8>,

    /// PRF primitive keyed with `sk_d`, reusable for Child SA derivation
    pub prf_d: Prf,
    /// Integrity primitive keyed with `sk_ai`
    pub integ_i: Integ,
    /// Integrity primitive keyed with `sk_ar`
    pub integ_r: Integ,
    /// Encryption primitive keyed with `sk_ei`
    pub encr_i: Encr,
    /// Encryption primitive keyed with `sk_er`
    pub encr_r: Encr,
    /// PRF primitive keyed with `sk_pi`
    pub prf_i: Prf,
    /// PRF primitive keyed with `sk_pr`
    pub prf_r: Prf,
}

impl Drop for IkeSaKey {
    fn drop(&mut self) {
        self.sk_d.zeroize();
        self.sk_ai.zeroize();
        self.sk_ar.zeroize();
        self.sk_ei.zeroize();
        self.sk_er.zeroize();
        self.sk_pi.zeroize();
        self.sk_pr.zeroize();
    }
}

impl fmt::Display for IkeSaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IkeSaKey {{")?;
        writeln!(f, "  dh_info:    {:?}", self.dh_info)?;
        writeln!(f, "  encr_info:  {:?}", self.encr_info)?;
        writeln!(f, "  integ_info: {:?}", self.integ_info)?;
        writeln!(f, "  prf_info:   {:?}", self.prf_info)?;
        writeln!(f, "  SK_ei:      {}", to_hex(&self.sk_ei))?;
        writeln!(f, "  SK_er:      {}", to_hex(&self.sk_er))?;
        writeln!(f, "  SK_ai:      {}", to_hex(&self.sk_ai))?;
        writeln!(f, "  SK_ar:      {}", to_hex(&self.sk_ar))?;
        writeln!(f, "  SK_pi:      {}", to_hex(&self.sk_pi))?;
        writeln!(f, "  SK_pr:      {}", to_hex(&self.sk_pr))?;
        writeln!(f, "  SK_d:       {}", to_hex(&self.sk_d))?;
        write!(f, "}}")
    }
}

impl IkeSaKey {
    /// Re-encode the bundle's four chosen transforms (DH, ENCR, INTEG, PRF)
    /// into a wire-shaped Proposal carrying protocol ID IKE.
    pub fn to_proposal(&self) -> Result<Proposal, KeyAgreementError> {
        let mut proposal = Proposal::new_empty(ProtocolId::Ike, None);
        proposal.add(vec![
            Transform::DiffieHellman(self.dh_info),
            Transform::Encryption(self.encr_info.0, self.encr_info.1),
            Transform::Integrity(self.integ_info),
            Transform::PseudoRandomFunction(self.prf_info),
        ]);
        proposal.build(1, true).map_err(|_| KeyAgreementError::EncodingFailure {
            operation: "to_proposal",
            transform_id: self.encr_info.0.transform_id(),
        })?;
        Ok(proposal)
    }
}

/// Perform the Diffie-Hellman exchange, derive SKEYSEED, and expand it via
/// PRF+ into the seven IKE SA keys.
///
/// `proposal` is expected to already have had its first transform of each
/// family chosen (index 0 of each group is consumed). `concatenated_nonces`
/// is `Ni || Nr`. Returns the key bundle together with this side's DH public
/// value, which the caller sends to the peer.
#[instrument(skip(peer_dh_public, concatenated_nonces))]
pub fn new_ike_sa_key(
    proposal: Option<&Proposal>,
    peer_dh_public: &[u8],
    concatenated_nonces: &[u8],
    initiator_spi: u64,
    responder_spi: u64,
) -> Result<(IkeSaKey, Vec<u8>), KeyAgreementError> {
    let proposal = proposal.ok_or(KeyAgreementError::MissingField {
        operation: OPERATION,
        field: "proposal",
    })?;
    let decoded = decode_ike_proposal(proposal)?;

    let group = dh::group_for(decoded.dh_info);
    let secret = random::generate_random_number()?;
    let local_dh_public = group.public_value(&secret);
    let shared_key = group.shared_key(&secret, peer_dh_public);

    // SKEYSEED = PRF(Ni || Nr, g^ir)
    let skeyseed_prf = Prf::init(decoded.prf_info, concatenated_nonces)?;
    let skeyseed = skeyseed_prf.compute(&shared_key);

    let mut seed = concatenated_nonces.to_vec();
    seed.extend_from_slice(&initiator_spi.to_be_bytes());
    seed.extend_from_slice(&responder_spi.to_be_bytes());

    let prf_key_len = Prf::key_length(decoded.prf_info);
    let integ_key_len = Integ::key_length(decoded.integ_info);
    let encr_key_len = encr::key_length(decoded.encr_info.0, decoded.encr_info.1).ok_or(
        KeyAgreementError::MissingField {
            operation: OPERATION,
            field: "encryption_algorithms.key_length",
        },
    )?;

    let total_key_length = prf_key_len * 3 + integ_key_len * 2 + encr_key_len * 2;

    let expansion_prf = Prf::init(decoded.prf_info, &skeyseed)?;
    let stream = prf_plus(&expansion_prf, &seed, total_key_length)?;

    let mut offset = 0usize;
    let sk_d = stream[offset..offset + prf_key_len].to_vec();
    offset += prf_key_len;
    let sk_ai = stream[offset..offset + integ_key_len].to_vec();
    offset += integ_key_len;
    let sk_ar = stream[offset..offset + integ_key_len].to_vec();
    offset += integ_key_len;
    let sk_ei = stream[offset..offset + encr_key_len].to_vec();
    offset += encr_key_len;
    let sk_er = stream[offset..offset + encr_key_len].to_vec();
    offset += encr_key_len;
    let sk_pi = stream[offset..offset + prf_key_len].to_vec();
    offset += prf_key_len;
    let sk_pr = stream[offset..offset + prf_key_len].to_vec();
    offset += prf_key_len;
    debug_assert_eq!(offset, total_key_length);

    let prf_d = Prf::init(decoded.prf_info, &sk_d)?;
    let integ_i = Integ::init(decoded.integ_info, &sk_ai)?;
    let integ_r = Integ::init(decoded.integ_info, &sk_ar)?;
    let encr_i = Encr::new_crypto(decoded.encr_info.0, &sk_ei)?;
    let encr_r = Encr::new_crypto(decoded.encr_info.0, &sk_er)?;
    let prf_i = Prf::init(decoded.prf_info, &sk_pi)?;
    let prf_r = Prf::init(decoded.prf_info, &sk_pr)?;

    tracing::debug!(
        total_key_length,
        dh = ?decoded.dh_info,
        encr = ?decoded.encr_info.0,
        integ = ?decoded.integ_info,
        prf = ?decoded.prf_info,
        "derived IKE SA key bundle"
    );

    Ok((
        IkeSaKey {
            dh_info: decoded.dh_info,
            encr_info: decoded.encr_info,
            integ_info: decoded.integ_info,
            prf_info: decoded.prf_info,
            sk_d,
            sk_ai,
            sk_ar,
            sk_ei,
            sk_er,
            sk_pi,
            sk_pr,
            prf_d,
            integ_i,
            integ_r,
            encr_i,
            encr_r,
            prf_i,
            prf_r,
        },
        local_dh_public,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ike_transforms::params::ProtocolId;

    fn full_proposal() -> Proposal {
        let mut proposal = Proposal::new_empty(ProtocolId::Ike, None);
        proposal.add(vec![
            Transform::DiffieHellman(DiffieHellmanGroup::Modp1024),
            Transform::Encryption(EncryptionAlgorithm::AesCbc, Some(256)),
            Transform::Integrity(IntegrityAlgorithm::HmacSha2_256_128),
            Transform::PseudoRandomFunction(PseudoRandomFunction::HmacSha1),
        ]);
        proposal
    }

    /// S2 — SKEYSEED computation with HMAC-SHA1.
    #[test]
    fn skeyseed_matches_hmac_sha1() {
        let ni = [0xAAu8; 16];
        let nr = [0xBBu8; 16];
        let shared = [0xCCu8; 128];
        let mut nonces = ni.to_vec();
        nonces.extend_from_slice(&nr);

        let prf = Prf::init(PseudoRandomFunction::HmacSha1, &nonces).unwrap();
        let skeyseed = prf.compute(&shared);
        assert_eq!(skeyseed.len(), 20);
    }

    /// S3 — key slicing order and lengths.
    #[test]
    fn key_slicing_order() {
        let prf_key_len = 20usize;
        let integ_key_len = 20usize;
        let encr_key_len = 32usize;
        let total = prf_key_len * 3 + integ_key_len * 2 + encr_key_len * 2;
        assert_eq!(total, 164);

        let stream: Vec<u8> = (0..total as u32).map(|i| (i % 256) as u8).collect();
        let mut offset = 0usize;
        let sk_d = &stream[offset..offset + prf_key_len];
        offset += prf_key_len;
        let sk_ai = &stream[offset..offset + integ_key_len];
        offset += integ_key_len;
        let sk_ar = &stream[offset..offset + integ_key_len];
        offset += integ_key_len;
        let sk_ei = &stream[offset..offset + encr_key_len];
        offset += encr_key_len;
        let sk_er = &stream[offset..offset + encr_key_len];
        offset += encr_key_len;
        let sk_pi = &stream[offset..offset + prf_key_len];
        offset += prf_key_len;
        let sk_pr = &stream[offset..offset + prf_key_len];
        offset += prf_key_len;

        assert_eq!(offset, 164);
        assert_eq!(sk_d, &stream[0..20]);
        assert_eq!(sk_ai, &stream[20..40]);
        assert_eq!(sk_ar, &stream[40..60]);
        assert_eq!(sk_ei, &stream[60..92]);
        assert_eq!(sk_er, &stream[92..124]);
        assert_eq!(sk_pi, &stream[124..144]);
        assert_eq!(sk_pr, &stream[144..164]);
    }

    /// S6 — rejection of a proposal with no integrity algorithm.
    #[test]
    fn rejects_proposal_missing_integrity() {
        let mut proposal = Proposal::new_empty(ProtocolId::Ike, None);
        proposal.add(vec![
            Transform::DiffieHellman(DiffieHellmanGroup::Modp1024),
            Transform::Encryption(EncryptionAlgorithm::AesCbc, Some(256)),
            Transform::PseudoRandomFunction(PseudoRandomFunction::HmacSha1),
        ]);
        let err = new_ike_sa_key(Some(&proposal), &[0u8; 128], &[0u8; 32], 1, 2).unwrap_err();
        assert!(matches!(err, KeyAgreementError::MissingField { field: "integrity_algorithms", .. }));
    }

    #[test]
    fn rejects_missing_proposal() {
        let err = new_ike_sa_key(None, &[], &[], 1, 2).unwrap_err();
        assert!(matches!(err, KeyAgreementError::MissingField { field: "proposal", .. }));
    }

    #[test]
    fn derives_full_bundle_and_round_trips_to_proposal() {
        let proposal = full_proposal();
        let peer_secret = num_bigint::BigUint::from(3u8);
        let peer_public = dh::group_for(DiffieHellmanGroup::Modp1024).public_value(&peer_secret);

        let (bundle, local_public) =
            new_ike_sa_key(Some(&proposal), &peer_public, &[0x01u8; 32], 1, 2).unwrap();

        assert_eq!(local_public.len(), 128);
        assert_eq!(bundle.sk_d.len(), 20);
        assert_eq!(bundle.sk_ai.len(), 32);
        assert_eq!(bundle.sk_ei.len(), 32);

        let wire = bundle.to_proposal().unwrap();
        assert_eq!(wire.diffie_hellman_groups, vec![DiffieHellmanGroup::Modp1024]);
        assert_eq!(wire.integrity_algorithms, vec![IntegrityAlgorithm::HmacSha2_256_128]);
    }
}
