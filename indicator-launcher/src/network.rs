//! Addresses advertised to the user.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

/// Best-effort LAN address of this machine.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn detect_lan_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified() && !ip.is_loopback()).then_some(ip)
}

/// LAN address worth advertising for a server bound to `bind`.
pub fn lan_address_for(bind: IpAddr) -> Option<IpAddr> {
    if bind.is_unspecified() {
        detect_lan_address()
    } else {
        None
    }
}

fn page_url(ip: IpAddr, port: u16, entry_file: &str) -> String {
    let path = entry_file.replace('\\', "/");
    format!(
        "http://{}/{}",
        SocketAddr::new(ip, port),
        path.trim_start_matches('/')
    )
}

/// URL the browser is pointed at.
///
/// Servers bound to every interface are reached through loopback of the
/// same family; a server bound to one address is reached through it.
pub fn browser_url(bind: IpAddr, port: u16, entry_file: &str) -> String {
    let host = match bind {
        IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        other => other,
    };
    page_url(host, port, entry_file)
}

/// Every URL worth printing: the browser URL plus, for servers bound to all
/// interfaces, the LAN URL when one was detected.
pub fn advertised_urls(
    bind: IpAddr,
    port: u16,
    entry_file: &str,
    lan: Option<IpAddr>,
) -> Vec<String> {
    let mut urls = vec![browser_url(bind, port, entry_file)];
    if bind.is_unspecified() {
        if let Some(ip) = lan {
            urls.push(page_url(ip, port, entry_file));
        }
    }
    urls
}

/// Print the access URLs the way both serving paths do.
pub fn print_urls(urls: &[String]) {
    println!("访问地址:");
    for url in urls {
        println!("  {url}");
    }
}
