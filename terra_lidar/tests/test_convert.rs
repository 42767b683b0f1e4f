/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![cfg(unix)]
#![allow(unused)]

use std::{fs, os::unix::fs::PermissionsExt, path::{Path, PathBuf}, process::Command, sync::LazyLock, time::{Duration, Instant}};
use anyhow::Result;
use terra_lidar::{ConversionInvoker, TerraLidarError};

// run with "cargo test test_xx -- --nocapture"

/// fake converter scripts. All of them are written before the first process is spawned (ETXTBSY)
static SCRIPTS: LazyLock<PathBuf> = LazyLock::new( || {
    let dir = std::env::temp_dir().join( format!("terra_convert_{}", std::process::id()));
    fs::create_dir_all( &dir).unwrap();
    write_script( &dir, "args.sh", r#"for a in "$@"; do echo "$a"; done"#);
    write_script( &dir, "fail.sh", r#"echo "reading $1"; printf 'corrupt header' >&2; exit 1"#);
    write_script( &dir, "slow.sh", r#"echo $$ > "$3/converter.pid"; exec sleep 30"#);
    write_script( &dir, "ok.sh", r#"cat "$1" > "$3/metadata.json""#);
    dir
});

fn write_script (dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write( &path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions( &path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn script (name: &str)->PathBuf {
    SCRIPTS.join(name)
}

#[tokio::test]
async fn test_argument_list()->Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("a;touch injected;b.laz");
    fs::write( &input, b"LASF")?;

    let invoker = ConversionInvoker::new( script("args.sh"), Duration::from_secs(10));
    let output = invoker.convert( &input, tmp.path()).await?;
    println!("{output}");

    // the filename is passed as one argument and not interpreted by a shell
    assert_eq!( output, format!("{}\n-o\n{}\n", input.display(), tmp.path().display()));
    assert!( !tmp.path().join("injected").exists());
    assert!( !Path::new("injected").exists());
    Ok(())
}

#[tokio::test]
async fn test_conversion_output()->Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("scan.laz");
    fs::write( &input, br#"{"points":1}"#)?;

    let invoker = ConversionInvoker::new( script("ok.sh"), Duration::from_secs(10));
    invoker.convert( &input, tmp.path()).await?;
    assert_eq!( fs::read( tmp.path().join("metadata.json"))?, br#"{"points":1}"#);
    Ok(())
}

#[tokio::test]
async fn test_failed_conversion()->Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("scan.laz");

    let invoker = ConversionInvoker::new( script("fail.sh"), Duration::from_secs(10));
    match invoker.convert( &input, tmp.path()).await {
        Err(TerraLidarError::ConversionError(stderr)) => assert_eq!( stderr, "corrupt header"),
        other => panic!("expected ConversionError, got {other:?}")
    }
    Ok(())
}

#[tokio::test]
async fn test_conversion_timeout()->Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("scan.laz");

    let invoker = ConversionInvoker::new( script("slow.sh"), Duration::from_millis(500));
    let t0 = Instant::now();
    let res = invoker.convert( &input, tmp.path()).await;
    let elapsed = t0.elapsed();
    println!("timed out after {elapsed:?}: {res:?}");

    match res {
        Err(TerraLidarError::ConversionError(msg)) => assert!( msg.contains("timed out")),
        other => panic!("expected ConversionError, got {other:?}")
    }
    assert!( elapsed < Duration::from_secs(10));

    // the converter process (the exec'ed sleep) is gone. Killed children can remain zombies until reaped
    let pid = fs::read_to_string( tmp.path().join("converter.pid"))?.trim().to_string();
    let mut terminated = false;
    for _ in 0..50 {
        if !is_running( &pid)? { terminated = true; break }
        tokio::time::sleep( Duration::from_millis(100)).await;
    }
    assert!( terminated, "converter process {pid} still running");
    Ok(())
}

fn is_running (pid: &str)->Result<bool> {
    let output = Command::new("ps").args(["-o", "stat=", "-p", pid]).output()?;
    let stat = String::from_utf8_lossy( &output.stdout).trim().to_string();
    Ok( !stat.is_empty() && !stat.starts_with('Z') )
}

#[tokio::test]
async fn test_missing_converter()->Result<()> {
    LazyLock::force( &SCRIPTS);
    let tmp = tempfile::tempdir()?;
    let invoker = ConversionInvoker::new( tmp.path().join("PotreeConverter"), Duration::from_secs(10));
    let res = invoker.convert( &tmp.path().join("scan.laz"), tmp.path()).await;
    assert!( matches!( res, Err(TerraLidarError::ConversionError(_))));
    Ok(())
}
