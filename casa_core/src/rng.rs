use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

// Provably-fair byte stream:
// HMAC-SHA256(key = server_seed, msg = "client_seed:nonce:block") for block = 0, 1, 2, ...
// The server publishes sha256(server_seed) up front and reveals the seed later.

pub type HmacSha256 = Hmac<Sha256>;

const BLOCK_LEN: usize = 32;

pub fn derive_hash_hex(input: &[u8]) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    server_seed: String, // secret
    client_seed: String,
    nonce: u64,
    block: u64,
    buffer: [u8; BLOCK_LEN],
    pos: usize,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            block: 0,
            buffer: [0; BLOCK_LEN],
            pos: BLOCK_LEN,
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_block(&self, block: u64) -> [u8; BLOCK_LEN] {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let msg = format!("{}:{}:{}", self.client_seed, self.nonce, block);
        mac.update(msg.as_bytes());
        let mut out = [0u8; BLOCK_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    fn next_byte(&mut self) -> u8 {
        if self.pos == BLOCK_LEN {
            self.buffer = self.hmac_block(self.block);
            self.block += 1;
            self.pos = 0;
        }
        let b = self.buffer[self.pos];
        self.pos += 1;
        b
    }
}

impl RngCore for ProvablyFairRng {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_be_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
