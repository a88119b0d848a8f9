//! Administrator privilege check

use crate::error::{PlatformError, Result};

/// Whether the current process runs with an elevated token
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use std::mem;
    use std::ptr;
    use winapi::shared::minwindef::{DWORD, LPVOID};
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
    use winapi::um::securitybaseapi::GetTokenInformation;
    use winapi::um::winnt::{TokenElevation, HANDLE, TOKEN_ELEVATION, TOKEN_QUERY};

    // SAFETY: the token handle is checked before use and closed once.
    unsafe {
        let mut token: HANDLE = ptr::null_mut();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            return false;
        }

        let mut elevation: TOKEN_ELEVATION = mem::zeroed();
        let mut returned: DWORD = 0;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut TOKEN_ELEVATION as LPVOID,
            mem::size_of::<TOKEN_ELEVATION>() as DWORD,
            &mut returned,
        );
        CloseHandle(token);

        ok != 0 && elevation.TokenIsElevated != 0
    }
}

/// Whether the current process runs with an elevated token
///
/// Service management only exists on Windows; elsewhere this reports
/// `false` so callers fail early with a clear message.
#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}

/// Fail with [`PlatformError::PermissionDenied`] unless elevated
pub fn require_elevation(action: &str) -> Result<()> {
    if is_elevated() {
        Ok(())
    } else {
        Err(PlatformError::PermissionDenied(format!(
            "run this command from an elevated prompt to {action}"
        )))
    }
}
