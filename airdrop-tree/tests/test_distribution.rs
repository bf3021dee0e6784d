use std::fs::File;
use std::io::{BufReader, Write};

use airdrop_tree::{
    leaf, Account, ClaimError, ClaimLedger, Config, Distribution, DistributionBuilder, HashKind,
    Keccak256Hasher, MerkleTree, Record,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn accounts(n: usize) -> Vec<(Account, u128)> {
    (0..n)
        .map(|i| {
            let mut a = [0u8; 20];
            a[..8].copy_from_slice(&(i as u64 + 1).to_be_bytes());
            a[19] = 0x5a;
            (a, 1_000_000_000_000_000_000u128 * (i as u128 % 7 + 1))
        })
        .collect()
}

#[test]
fn test_artifact_round_trip() {
    init_logging();
    let entries = accounts(257);
    let distribution = DistributionBuilder::default().build(&entries).unwrap();

    let dir = tempfile::Builder::new()
        .prefix("test_artifact_round_trip")
        .tempdir()
        .unwrap();
    let path = dir.path().join("airdropMerkle.json");
    let mut file = File::create(&path).unwrap();
    file.write_all(distribution.to_json_pretty().unwrap().as_bytes())
        .unwrap();
    drop(file);

    let loaded: Distribution =
        serde_json::from_reader(BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(loaded, distribution);
    assert_eq!(loaded.claims.len(), 257);
    let expected_total: u128 = entries.iter().map(|(_, amount)| amount).sum();
    assert_eq!(loaded.token_total().unwrap(), expected_total);

    for account in loaded.claims.keys() {
        assert!(loaded.verify_claim(account).unwrap());
    }
}

#[test]
fn test_artifact_field_names() {
    init_logging();
    let distribution = DistributionBuilder::default().build(&accounts(2)).unwrap();
    let value = serde_json::to_value(&distribution).unwrap();
    assert!(value["merkleRoot"].as_str().unwrap().starts_with("0x"));
    assert_eq!(value["merkleRoot"].as_str().unwrap().len(), 66);
    assert!(value["tokenTotal"].as_str().unwrap().starts_with("0x"));
    assert_eq!(value["hashFunction"], "keccak256");

    let claims = value["claims"].as_object().unwrap();
    assert_eq!(claims.len(), 2);
    for claim in claims.values() {
        assert!(claim["index"].is_u64());
        assert!(claim["amount"].as_str().unwrap().starts_with("0x"));
        for sibling in claim["proof"].as_array().unwrap() {
            assert_eq!(sibling.as_str().unwrap().len(), 66);
        }
    }
}

#[test]
fn test_tree_and_distribution_agree() {
    init_logging();
    let entries = accounts(40);
    let records: Vec<Record> = entries
        .iter()
        .enumerate()
        .map(|(i, (a, amt))| Record::new(i as u64, *a, *amt))
        .collect();
    let builder = DistributionBuilder::default();
    let tree: MerkleTree<Keccak256Hasher> = builder.tree(&records).unwrap();
    let distribution = builder.build_records(&records).unwrap();
    assert_eq!(distribution.root().unwrap(), tree.root());

    for record in &records {
        let info = distribution
            .claim(&leaf::format_account(&record.account))
            .unwrap();
        assert_eq!(info.proof, tree.proof(&record.leaf::<Keccak256Hasher>()).unwrap());
    }
}

#[test]
fn test_sorted_leaves_ignore_record_order() {
    init_logging();
    let mut config = Config::from_hash(HashKind::Keccak256);
    config.set_sort_leaves(true);
    let builder = DistributionBuilder::new(config);

    let records: Vec<Record> = accounts(25)
        .into_iter()
        .enumerate()
        .map(|(i, (a, amt))| Record::new(i as u64, a, amt))
        .collect();
    let mut shuffled = records.clone();
    shuffled.reverse();
    shuffled.swap(3, 17);

    let a = builder.build_records(&records).unwrap();
    let b = builder.build_records(&shuffled).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_claim_flow() {
    init_logging();
    let entries = accounts(130);
    let distribution = DistributionBuilder::default().build(&entries).unwrap();
    let ledger: ClaimLedger = ClaimLedger::from_distribution(&distribution).unwrap();

    let (account, amount) = entries[129];
    let info = distribution
        .claim(&leaf::format_account(&account))
        .unwrap();
    assert_eq!(info.index, 129);

    ledger
        .claim(info.index, &account, amount, info.proof.siblings())
        .unwrap();
    assert_eq!(
        ledger
            .claim(info.index, &account, amount, info.proof.siblings())
            .unwrap_err(),
        ClaimError::AlreadyClaimed { index: 129 }
    );
    // index 129 is bit 1 of the second 128-bit word
    assert_eq!(ledger.claimed_word(129), 1u128 << 1);
    assert_eq!(ledger.claimed_word(0), 0);
}

#[test]
fn test_claim_flow_caller_indices() {
    init_logging();
    let indices = [u64::MAX, 1 << 63, 1 << 40, 7];
    let records: Vec<Record> = accounts(indices.len())
        .into_iter()
        .zip(indices)
        .map(|((a, amt), index)| Record::new(index, a, amt))
        .collect();
    let distribution = DistributionBuilder::default()
        .build_records(&records)
        .unwrap();
    let loaded = Distribution::from_json(&distribution.to_json_pretty().unwrap()).unwrap();
    assert_eq!(loaded, distribution);

    let ledger: ClaimLedger = ClaimLedger::from_distribution(&loaded).unwrap();
    for (account, info) in &loaded.claims {
        let amount = loaded.token_total().unwrap();
        assert!(ledger.claim_hex(info.index, account, amount, &info.proof.to_hex()).is_err());

        let record = records.iter().find(|r| r.index == info.index).unwrap();
        ledger
            .claim_hex(info.index, account, record.amount, &info.proof.to_hex())
            .unwrap();
    }
    assert_eq!(ledger.claimed_count(), 4);
    for index in indices {
        assert!(ledger.is_claimed(index));
    }
    assert_eq!(ledger.claimed_word(u64::MAX), 1u128 << 127);
    assert_eq!(ledger.claimed_word(1 << 63), 1);
    assert_eq!(ledger.claimed_word(7), 1 << 7);
}
