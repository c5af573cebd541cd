// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;

use crate::{Args, parse_session_days};

fn parse(args: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once("taxi-server").chain(args.iter().copied()))
}

#[test]
fn test_defaults() {
    let args = parse(&[]).unwrap();
    assert_eq!(args.session_days, 30);
    assert_eq!(args.port, 8000);
    assert_eq!(args.bind, "127.0.0.1");
    assert!(args.database.is_none());
    assert!(args.create_superuser.is_none());
}

#[test]
fn test_session_days_bounds() {
    assert_eq!(parse(&["--session-days", "1"]).unwrap().session_days, 1);
    assert_eq!(
        parse(&["--session-days", "3650"]).unwrap().session_days,
        3650
    );

    assert!(parse(&["--session-days", "0"]).is_err());
    assert!(parse(&["--session-days=-1"]).is_err());
    assert!(parse(&["--session-days", "3651"]).is_err());
    assert!(parse(&["--session-days", "5000000"]).is_err());
    assert!(parse(&["--session-days", "200000000000000"]).is_err());
}

#[test]
fn test_create_superuser_credentials() {
    let args = parse(&["--create-superuser", "admin:secret:with:colons"]).unwrap();
    assert_eq!(
        args.create_superuser,
        Some((String::from("admin"), String::from("secret:with:colons")))
    );

    assert!(parse(&["--create-superuser", "admin"]).is_err());
    assert!(parse(&["--create-superuser", ":secret"]).is_err());
}

#[test]
fn test_session_days_rejects_non_numbers() {
    assert!(parse_session_days("thirty").is_err());
    assert!(parse_session_days("1.5").is_err());
    assert_eq!(parse_session_days("7"), Ok(7));
}
