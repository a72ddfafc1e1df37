//! Integration tests for video discovery
//!
//! These tests verify:
//! - Directory scans against a real temporary folder
//! - Page scans against a loopback HTTP server
//! - The record shape shared by both

use anyhow::Result;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tplayer::discovery::{size_to_human, FileManager, UrlScanner};
use tplayer::utils::config::NetworkConfig;

/// Answer every request with `page` for GET and a fixed length for HEAD
fn serve_page(page: &'static str) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let response = if request.starts_with(b"HEAD") {
                "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: 5242880\r\nConnection: close\r\n\r\n"
                    .to_string()
            } else {
                format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    page.len(),
                    page
                )
            };
            let _ = stream.write_all(response.as_bytes());
        }
    });

    Ok(format!("http://{}", addr))
}

#[test]
fn test_directory_scan_filters_and_describes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("a.mp4"), vec![0u8; 2048])?;
    fs::write(dir.path().join("b.txt"), b"notes")?;
    fs::write(dir.path().join("C.MKV"), vec![0u8; 10])?;
    fs::create_dir(dir.path().join("folder.avi"))?;

    let mut files = FileManager::new(None);
    let records = files.scan_directory(dir.path());

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.name != "b.txt"));

    let mp4 = records.iter().find(|r| r.name == "a.mp4").expect("a.mp4 listed");
    assert_eq!(mp4.size_display, "2.0 KB");
    assert_eq!(mp4.type_tag, "MP4");
    assert!(mp4.locator.starts_with("file://"));

    let mkv = records.iter().find(|r| r.name == "C.MKV").expect("C.MKV listed");
    assert_eq!(mkv.size_display, "10.0 B");
    assert_eq!(mkv.type_tag, "MKV");

    assert_eq!(files.last_directory(), dir.path().canonicalize()?);
    Ok(())
}

#[test]
fn test_missing_directory_is_empty() {
    let mut files = FileManager::new(None);
    let before = files.last_directory().to_path_buf();

    assert!(files.scan_directory("/definitely/not/here".as_ref()).is_empty());
    assert_eq!(files.last_directory(), before);
}

#[test]
fn test_page_scan_resolves_links_and_sizes() -> Result<()> {
    let page = r#"<html><body>
        <a href="clips/one.mp4">one</a>
        <A HREF='/media/two.WEBM'>two</A>
        <a href="readme.html">readme</a>
        <!-- <a href="hidden.mkv"> -->
    </body></html>"#;
    let base = serve_page(page)?;

    let scanner = UrlScanner::new(&NetworkConfig::default())?;
    let records = scanner.scan_url(&format!("{}/videos/", base));

    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["one.mp4", "two.WEBM", "hidden.mkv"]);
    assert_eq!(records[0].locator, format!("{}/videos/clips/one.mp4", base));
    assert_eq!(records[1].locator, format!("{}/media/two.WEBM", base));
    assert!(records.iter().all(|r| r.size_display == size_to_human(5_242_880)));
    assert_eq!(records[1].type_tag, "WEBM");
    Ok(())
}

#[test]
fn test_direct_video_by_content_type() -> Result<()> {
    let base = serve_page("")?;
    let scanner = UrlScanner::new(&NetworkConfig::default())?;

    assert!(scanner.is_direct_video(&format!("{}/stream", base)));
    assert!(scanner.is_direct_video("http://x/y.mp4"));
    Ok(())
}

#[test]
fn test_closed_session_fails_soft() -> Result<()> {
    let base = serve_page("<a href=\"a.mp4\">a</a>")?;
    let mut scanner = UrlScanner::new(&NetworkConfig::default())?;
    scanner.cleanup();
    scanner.cleanup();

    assert!(scanner.scan_url(&base).is_empty());
    assert!(!scanner.is_direct_video(&format!("{}/stream", base)));
    assert!(scanner.get_video_info(&format!("{}/a.mp4", base)).is_none());
    Ok(())
}
