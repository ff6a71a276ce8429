/// Host portion of a reported node address.
///
/// `"[v6]:port"` yields `v6`, `"host:port"` yields `host`, and anything
/// else (a bare host or a bare IPv6 literal) is returned unchanged.
#[must_use]
pub fn host_of(address: &str) -> &str {
    if let Some(rest) = address.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &rest[..end],
            None => address,
        };
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            host
        }
        _ => address,
    }
}
