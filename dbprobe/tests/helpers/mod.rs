//! Shared helpers for dbprobe integration tests
//!
//! A shell script stands in for the `mysql` binary. It answers
//! `show databases` and `show tables` from fixed data and logs its
//! arguments to `invocations.log` next to itself.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fake client: `api_production` has two tables, `empty_db` has none,
/// anything else is unknown.
pub const FAKE_MYSQL: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/invocations.log"
db=""
query=""
while [ $# -gt 0 ]; do
  case "$1" in
    --database=*) db="${1#--database=}" ;;
    -e) shift; query="$1" ;;
  esac
  shift
done
case "$query" in
  "show databases")
    printf 'information_schema\napi_production\napi_production_old\nempty_db\n'
    ;;
  "show tables")
    case "$db" in
      api_production) printf 'accounts\nusers\n' ;;
      empty_db) ;;
      *) echo "ERROR 1049 (42000): Unknown database '$db'" >&2; exit 1 ;;
    esac
    ;;
  *)
    echo "ERROR 1064 (42000): unexpected query" >&2; exit 1
    ;;
esac
"#;

pub fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("Should write fake client");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Should mark fake client executable");
    path
}
