//! Process-elevation probe.
//!
//! Low-level hooks can observe less when other processes run elevated and
//! this one does not; the probe only feeds the diagnostic shown when hook
//! installation fails.

use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Security::{
    GetTokenInformation, OpenProcessToken, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
};
use windows::Win32::System::Threading::GetCurrentProcess;

/// Does the current process hold an elevated token?
///
/// Every failure path reads as "not elevated"; the caller only uses this
/// to choose wording, so a wrong "false" is harmless while a propagated
/// error would not be.
pub fn is_process_elevated() -> bool {
    unsafe {
        let mut token = HANDLE::default();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).is_err() {
            return false;
        }

        let mut elevation = TOKEN_ELEVATION::default();
        let mut returned = 0u32;
        let queried = GetTokenInformation(
            token,
            TokenElevation,
            Some(&mut elevation as *mut _ as *mut _),
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );
        let _ = CloseHandle(token);

        queried.is_ok() && elevation.TokenIsElevated != 0
    }
}
