//! Diffie-Hellman group math: the DH family of the Transform Registry.
//!
//! Each supported MODP group is a concrete type bound to its RFC prime and
//! generator; `DiffieHellmanGroup` (from `ike-transforms`) selects which one
//! a given proposal asked for.

use ike_transforms::DiffieHellmanGroup;
use num_bigint::BigUint;

/// The capability contract every supported DH group implements.
///
/// Public values and shared keys are always zero-padded on the left to the
/// exact byte length of the group's prime, per RFC 7296 §2.12.
pub trait DhGroup {
    /// The on-wire Transform ID this group is selected by.
    fn transform_id(&self) -> DiffieHellmanGroup;

    /// Byte length of the group prime; also the length of every returned value.
    fn prime_byte_len(&self) -> usize;

    /// `g^secret mod p`, zero-padded to `prime_byte_len()`.
    fn public_value(&self, secret: &BigUint) -> Vec<u8>;

    /// `peer_public^secret mod p`, zero-padded to `prime_byte_len()`.
    fn shared_key(&self, secret: &BigUint, peer_public: &[u8]) -> Vec<u8>;
}

fn zero_pad(value: &BigUint, len: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(raw.len())];
    out.extend_from_slice(&raw);
    out
}

/// A MODP group defined by a fixed prime and generator (RFC 2409 / RFC 3526).
pub struct ModpGroup {
    id: DiffieHellmanGroup,
    prime: BigUint,
    generator: BigUint,
}

impl DhGroup for ModpGroup {
    fn transform_id(&self) -> DiffieHellmanGroup {
        self.id
    }

    fn prime_byte_len(&self) -> usize {
        self.prime.to_bytes_be().len()
    }

    fn public_value(&self, secret: &BigUint) -> Vec<u8> {
        zero_pad(&self.generator.modpow(secret, &self.prime), self.prime_byte_len())
    }

    fn shared_key(&self, secret: &BigUint, peer_public: &[u8]) -> Vec<u8> {
        let peer = BigUint::from_bytes_be(peer_public);
        zero_pad(&peer.modpow(secret, &self.prime), self.prime_byte_len())
    }
}

fn hex_prime(hex: &str) -> BigUint {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    BigUint::parse_bytes(digits.as_bytes(), 16).unwrap_or_default()
}

/// Oakley Group 2, RFC 2409 section 6.2: a 1024-bit MODP group.
fn modp_1024() -> ModpGroup {
    ModpGroup {
        id: DiffieHellmanGroup::Modp1024,
        generator: BigUint::from(2u8),
        prime: hex_prime(
            "FFFFFFFF FFFFFFFF C90FDAA2 2168C234 C4C6628B 80DC1CD1
             29024E08 8A67CC74 020BBEA6 3B139B22 514A0879 8E3404DD
             EF9519B3 CD3A431B 302B0A6D F25F1437 4FE1356D 6D51C245
             E485B576 625E7EC6 F44C42E9 A637ED6B 0BFF5CB6 F406B7ED
             EE386BFB 5A899FA5 AE9F2411 7C4B1FE6 49286651 ECE45B3D
             C2007CB8 A163BF05 98DA4836 1C55D39A 69163FA8 FD24CF5F
             83655D23 DCA3AD96 1C62F356 208552BB 9ED52907 7096966D
             670C354E 4ABC9804 F1746C08 CA18217C 32905E46 2E36CE3B
             E39E772C 180E8603 9B2783A2 EC07A28F B5C55DF0 6F4C52C9
             DE2BCBF6 95581718 3995497C EA956AE5 15D22618 98FA0510
             15728E5A 8AACAA68 FFFFFFFF FFFFFFFF",
        ),
    }
}

/// RFC 3526 section 3: a 2048-bit MODP group.
fn modp_2048() -> ModpGroup {
    ModpGroup {
        id: DiffieHellmanGroup::Modp2048,
        generator: BigUint::from(2u8),
        prime: hex_prime(
            "FFFFFFFF FFFFFFFF C90FDAA2 2168C234 C4C6628B 80DC1CD1
             29024E08 8A67CC74 020BBEA6 3B139B22 514A0879 8E3404DD
             EF9519B3 CD3A431B 302B0A6D F25F1437 4FE1356D 6D51C245
             E485B576 625E7EC6 F44C42E9 A637ED6B 0BFF5CB6 F406B7ED
             EE386BFB 5A899FA5 AE9F2411 7C4B1FE6 49286651 ECE45B3D
             C2007CB8 A163BF05 98DA4836 1C55D39A 69163FA8 FD24CF5F
             83655D23 DCA3AD96 1C62F356 208552BB 9ED52907 7096966D
             670C354E 4ABC9804 F1746C08 CA18217C 32905E46 2E36CE3B
             E39E772C 180E8603 9B2783A2 EC07A28F B5C55DF0 6F4C52C9
             DE2BCBF6 95581718 3995497C EA956AE5 15D22618 98FA0510
             15728E5A 8AAAC42D AD33170D 04507A33 A85521AB DF1CBA64
             ECFB8504 58DBEF0A 8AEA7157 5D060C7D B3970F85 A6E1E4C7
             ABF5AE8C DB0933D7 1E8C94E0 4A25619D CEE3D226 1AD2EE6B
             F12FFA06 D98A0864 D8760273 3EC86A64 521F2B18 177B200C
             BBE11757 7A615D6C 770988C0 BAD946E2 08E24FA0 74E5AB31
             43DB5BFC E0FD108E 4B82D120 A93AD2CA FFFFFFFF FFFFFFFF",
        ),
    }
}

/// Resolve a Transform Registry DH selection to its concrete group math.
///
/// This is total: every `DiffieHellmanGroup` variant the closed catalog
/// recognizes has a corresponding group defined here.
pub fn group_for(id: DiffieHellmanGroup) -> ModpGroup {
    match id {
        DiffieHellmanGroup::Modp1024 => modp_1024(),
        DiffieHellmanGroup::Modp2048 => modp_2048(),
    }
}
