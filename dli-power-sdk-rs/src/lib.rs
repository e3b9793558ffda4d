use md5::{Digest, Md5};

pub use client::PowerSwitch;
pub use connection::Authentication;
pub use types::config;
pub use types::outlet::{format_status_table, parse_outlet_rows};
pub use types::DliPowerError;
pub use types::{Outlet, OutletState};
pub use types::{SwitchConfig, SwitchDefaults, SwitchSettings};

mod client;
mod connection;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod fake_pdu;

/// Password field for the login form: md5 over challenge, user, password, challenge.
pub fn challenge_response(challenge: &str, userid: &str, password: &str) -> String {
    let mut md5_hasher = Md5::new();

    md5_hasher.update(challenge);
    md5_hasher.update(userid);
    md5_hasher.update(password);
    md5_hasher.update(challenge);
    hex::encode(md5_hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_response_is_md5_hex_of_concatenation() {
        assert_eq!(challenge_response("", "", ""), "d41d8cd98f00b204e9800998ecf8427e");
        // "" + "a" + "bc" + "" hashes the same as "abc"
        assert_eq!(challenge_response("", "a", "bc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
