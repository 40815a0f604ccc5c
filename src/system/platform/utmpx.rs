use crate::system::provider::Session;

/// Entries of type `USER_PROCESS` from the utmpx database.
pub(super) fn read_user_sessions() -> Vec<Session> {
    let mut sessions = Vec::new();
    // SAFETY: the utmpx cursor is process-global and not reentrant. It is
    // only walked here, from the single collection thread, and every
    // returned record is copied out before the next call.
    unsafe {
        libc::setutxent();
        loop {
            let entry = libc::getutxent();
            if entry.is_null() {
                break;
            }
            let entry = &*entry;
            if entry.ut_type != libc::USER_PROCESS {
                continue;
            }
            let name = c_field(&entry.ut_user);
            if name.is_empty() {
                continue;
            }
            let host = c_field(&entry.ut_host);
            sessions.push(Session {
                name,
                host: (!host.is_empty()).then_some(host),
            });
        }
        libc::endutxent();
    }
    sessions
}

fn c_field(raw: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
