//! SAE test vectors

use crate::{FfcParams, MacAddress};
use hex_literal::hex;

/// First station address.
pub const MAC_A: MacAddress = hex!("020000000001");

/// Second station address.
pub const MAC_B: MacAddress = hex!("020000000002");

/// Shared password.
pub const PASSWORD: &[u8] = b"test";

/// Small non-safe-prime group: a 127-bit `p` with a 64-bit subgroup order.
///
/// Fast enough to run whole handshakes in debug builds. Offers no security.
pub const TOY_FFC_GROUP: FfcParams = FfcParams {
    id: 0xfff0,
    prime: &hex!("400000000000005e3b5efeadd71698e7"),
    order: &hex!("c3a5c85c97cb3171"),
    safe_prime: false,
};

/// PWE for [`MAC_A`], [`MAC_B`], [`PASSWORD`] in [`TOY_FFC_GROUP`].
///
/// Counter 1 is rejected as `>= p`; counter 2 succeeds.
pub const TOY_FFC_PWE: [u8; 16] = hex!("309bfc94c8d0c8aa079f14b06249b6ad");

/// PWE for [`MAC_A`], [`MAC_B`], [`PASSWORD`] in group 1 (768-bit MODP).
pub const MODP_768_PWE: [u8; 96] = hex!(
    "49f655035951e88b8ca4bde74b16c6792a484eb76a69938ab64883abc5e8fab6"
    "238bc328ffb869108047a9d6e24a5cff5602fc3fba3faf2fda3011b4e34e07f9"
    "603c1c55f38f09734e05cad6c48c4dd11f0f80d5b7042e538f8dbc32c8e024eb"
);

/// Leading 32 bytes of the PWE for [`MAC_A`], [`MAC_B`], [`PASSWORD`] in
/// group 5 (1536-bit MODP).
pub const MODP_1536_PWE_PREFIX: [u8; 32] =
    hex!("93b8c9a697fcd6e7f559c6c41a07e7127dad5764ffd45dbc254bc46925f204ea");

/// PWE `x ‖ y` for [`MAC_A`], [`MAC_B`], [`PASSWORD`] on P-256.
pub const P256_PWE: [u8; 64] = hex!(
    "a33005cc189705e6f9b8d91b275f27b9288d985a6d5e87b99e1c0976089f33af"
    "9937a6e66b30eafc64ca9c916799fe2d9d23e5209f005b3bd77f0b4302039fe0"
);

/// PWE `x ‖ y` on P-256 for a password found only at counter 4.
pub const P256_PWE_COUNTER_4: PweVector = PweVector {
    addr1: hex!("827b919dd4b9"),
    addr2: hex!("1eec49ea6488"),
    password: b"mekmitasdigoat",
    pwe: &hex!(
        "69fdf86f627405902901384ca7ac713dcc6e89b3f5707d5980a3d6af7ee4c925"
        "db41b30c5b8cf9d292959e1dd6a63d79669ee28d1b3281d4a6ad015cfb5c4a4f"
    ),
};

/// PWE `x ‖ y` for [`MAC_A`], [`MAC_B`], [`PASSWORD`] on P-384.
pub const P384_PWE: [u8; 96] = hex!(
    "4786a61e1ddd825abfb0e26bea506389f4da4d27e8b6b7c9d77d546d9605c5f9"
    "b7163c4a873851380e33d1e4da6c1987a64f7cfc39188ba91ceb25335ef97adc"
    "ddfc39e0867042831446e5f0533a17f982d1b18f2128021824fd4409a99e1b3e"
);

/// PWE `x ‖ y` for [`MAC_A`], [`MAC_B`], [`PASSWORD`] on P-521.
pub const P521_PWE: [u8; 132] = hex!(
    "00583251e7ed7471fccd2887fdc9ea3d71a44c468841f5267db828eec5c6e2d5"
    "c23c6a5965b5cef47b83dec43032718ee285f48ce4dea405d40894660b95b975"
    "2b170116e87a46344367f6e3924ac7e65b349033b35e00133f7b4c5760624178"
    "8c6205b9a911aadfd5ca800b156511eb7d300e4ccf16b29d7c3971f13b9dc766"
    "60cc95da"
);

/// Password element derivation inputs and output.
#[derive(Debug)]
pub struct PweVector {
    /// Station address.
    pub addr1: MacAddress,
    /// Peer address.
    pub addr2: MacAddress,
    /// Password.
    pub password: &'static [u8],
    /// Encoded PWE.
    pub pwe: &'static [u8],
}

/// Key schedule known answer: inputs `k`, two commit scalars and the P-256
/// order; outputs KCK, PMK and PMKID.
pub mod key_schedule {
    use hex_literal::hex;

    /// Shared secret `k`.
    pub const K: [u8; 32] =
        hex!("0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20");
    /// First commit scalar.
    pub const SCALAR_1: [u8; 32] = [0x11; 32];
    /// Second commit scalar.
    pub const SCALAR_2: [u8; 32] = [0x22; 32];
    /// `HMAC-SHA-256(0^32, k)`
    pub const KEYSEED: [u8; 32] =
        hex!("23499e7edf0fbe6baa137df0f23becaefa722ad19fc262855409de8cd8b3c897");
    /// Key confirmation key.
    pub const KCK: [u8; 32] =
        hex!("e091e65a475587ca16cd89dfb0bb2175702667b572b615ae94910e135d3ffee9");
    /// Pairwise master key.
    pub const PMK: [u8; 32] =
        hex!("f1625404387d793e61caabf36e21427f06bc2e1d53561e1e30f374270ffbb8b5");
    /// PMK identifier.
    pub const PMKID: [u8; 16] = [0x33; 16];
}
