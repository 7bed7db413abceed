pub mod test_roster_snapshot_idempotent;
