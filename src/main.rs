//! keyshare demo main.rs
//! Demonstrates threshold splitting of an RSA private key:
//! - RSA-2048 keypair, private key split 2-of-3
//! - RSA-OAEP encryption with the clear public key
//! - reconstruction from different share subsets

use keyshare::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- Generate a 2-of-3 shared secret ---
    let uid = uuid::Uuid::new_v4();
    let bundle = generate_shared_secret(uid, 3, 2, KeyAlgorithm::Rsa { bits: 2048 })?;

    println!("Bundle {}:", bundle.uid);
    println!("  scheme: {}", bundle.scheme);
    println!("  public key: {} bytes", bundle.public_key.len());
    for share in &bundle.shares {
        println!("  share {}: {} bytes", share.index, share.to_bytes()?.len());
    }

    // --- Encrypt with the public key ---
    let message = b"Mon h\xc3\xa2t \xc3\xa8st joli";
    let ciphertext = encrypt(&bundle.public_key()?, message)?;
    println!("\nCiphertext: {} bytes", ciphertext.len());

    // --- Any two shares decrypt ---
    for subset in [[0usize, 1], [1, 2], [0, 2]] {
        let shares: Vec<Share> = subset.iter().map(|&i| bundle.shares[i].clone()).collect();
        let private_key = bundle.recover_private_key(&shares)?;
        let plaintext = decrypt(&private_key, &ciphertext)?;
        println!(
            "Shares {:?} decrypted: {}",
            shares.iter().map(|s| s.index).collect::<Vec<_>>(),
            String::from_utf8_lossy(&plaintext)
        );
        assert_eq!(plaintext, message);
    }

    // --- A single share is rejected ---
    let res = bundle.recover_private_key(&bundle.shares[..1]);
    assert!(res.is_err());
    if let Err(e) = res {
        println!("\nSingle share rejected as expected: {e}");
    }

    Ok(())
}
