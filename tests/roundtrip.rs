use keyshare::*;

#[test]
fn rsa_2048_two_of_three() {
    let uid = uuid::Uuid::new_v4();
    let bundle = generate_shared_secret(uid, 3, 2, KeyAlgorithm::Rsa { bits: 2048 }).unwrap();

    assert_eq!(bundle.uid, uid);
    assert_eq!(bundle.shares.len(), 3);
    assert_eq!(bundle.keys_count, 3);
    assert_eq!(bundle.threshold_count, 2);

    let msg = "Mon hât èst joli".as_bytes();
    let ciphertext = encrypt(&bundle.public_key().unwrap(), msg).unwrap();

    // Shares {1,2} and {2,3} rebuild the same key bytes
    let from_12 = reconstruct_secret(&bundle.shares[0..2]).unwrap();
    let from_23 = reconstruct_secret(&bundle.shares[1..3]).unwrap();
    assert_eq!(*from_12, *from_23);

    for subset in [&bundle.shares[0..2], &bundle.shares[1..3]] {
        let private_key = bundle.recover_private_key(subset).unwrap();
        assert_eq!(decrypt(&private_key, &ciphertext).unwrap(), msg);
        assert_eq!(*serialize_private_key(&private_key).unwrap(), *from_12);
    }

    // Share {1} alone is not enough
    let err = bundle.recover_private_key(&bundle.shares[0..1]).unwrap_err();
    assert!(matches!(err, KeyshareError::ReconstructionFailure(_)));
}

#[test]
fn threshold_above_count_rejected() {
    let err = generate_shared_secret(uuid::Uuid::new_v4(), 3, 5, KeyAlgorithm::Rsa { bits: 2048 }).unwrap_err();
    assert_eq!(
        err,
        KeyshareError::InvalidThreshold {
            threshold: 5,
            keys_count: 3
        }
    );
}

#[test]
fn chunk_codec_pipeline() {
    let data = b"private key bytes of awkward length".to_vec();
    let chunks = split_as_padded_chunks(&data, 3).unwrap();
    assert!(chunks.iter().all(|c| c.len() == 3));

    let columns = vec![chunks];
    let recombined = recombine_shares_into_bytestring(&columns).unwrap();
    let unpadded = unpad_last_element(recombined).unwrap();
    assert_eq!(join_chunks(&unpadded), data);
}
