use bitflags::bitflags;
use std::fmt;
use thiserror::Error;

bitflags! {
    /// The set of FTP capabilities granted to a user.
    ///
    /// Each flag corresponds to one capability letter of the classic
    /// `elradfmwM` permission string:
    ///
    /// Read capabilities:
    ///  - `e` = change directory (CWD command)
    ///  - `l` = list files (LIST, NLST, STAT, MLSD, MLST, SIZE, MDTM commands)
    ///  - `r` = retrieve a file from the server (RETR command)
    ///
    /// Write capabilities:
    ///  - `a` = append data to an existing file (APPE command)
    ///  - `d` = delete a file or directory (DELE, RMD commands)
    ///  - `f` = rename a file or directory (RNFR, RNTO commands)
    ///  - `m` = create a directory (MKD command)
    ///  - `w` = store a file on the server (STOR, STOU commands)
    ///  - `M` = change file mode (SITE CHMOD command)
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PermissionSet: u16 {
        /// `e` — change directory.
        const CHANGE_DIR = 0b0_0000_0001;
        /// `l` — list files.
        const LIST = 0b0_0000_0010;
        /// `r` — retrieve a file.
        const RETRIEVE = 0b0_0000_0100;
        /// `a` — append to an existing file.
        const APPEND = 0b0_0000_1000;
        /// `d` — delete a file or directory.
        const DELETE = 0b0_0001_0000;
        /// `f` — rename a file or directory.
        const RENAME = 0b0_0010_0000;
        /// `m` — create a directory.
        const MKDIR = 0b0_0100_0000;
        /// `w` — store a file.
        const STORE = 0b0_1000_0000;
        /// `M` — change file mode.
        const CHMOD = 0b1_0000_0000;
    }
}

/// Capability letters in their conventional order.
const LETTERS: [(char, PermissionSet); 9] = [
    ('e', PermissionSet::CHANGE_DIR),
    ('l', PermissionSet::LIST),
    ('r', PermissionSet::RETRIEVE),
    ('a', PermissionSet::APPEND),
    ('d', PermissionSet::DELETE),
    ('f', PermissionSet::RENAME),
    ('m', PermissionSet::MKDIR),
    ('w', PermissionSet::STORE),
    ('M', PermissionSet::CHMOD),
];

impl PermissionSet {
    /// The read capabilities, `elr`.
    pub const READ: PermissionSet = PermissionSet::CHANGE_DIR.union(PermissionSet::LIST).union(PermissionSet::RETRIEVE);

    /// The write capabilities, `adfmwM`.
    pub const WRITE: PermissionSet = PermissionSet::APPEND
        .union(PermissionSet::DELETE)
        .union(PermissionSet::RENAME)
        .union(PermissionSet::MKDIR)
        .union(PermissionSet::STORE)
        .union(PermissionSet::CHMOD);

    /// The full capability set, `elradfmwM`.
    pub fn full() -> PermissionSet {
        PermissionSet::READ | PermissionSet::WRITE
    }

    /// The capability named by a single letter, if there is one.
    pub fn from_letter(letter: char) -> Option<PermissionSet> {
        LETTERS.iter().find(|(l, _)| *l == letter).map(|(_, p)| *p)
    }

    /// Parses a permission string such as `"elr"` into a set.
    pub fn from_letters(letters: &str) -> Result<PermissionSet, UnknownPermission> {
        letters.chars().try_fold(PermissionSet::empty(), |set, letter| {
            PermissionSet::from_letter(letter).map(|p| set | p).ok_or(UnknownPermission { letter })
        })
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, perm) in LETTERS {
            if self.contains(perm) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PermissionSet({self})")
    }
}

/// Returned when a permission string contains a letter outside `elradfmwM`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("unknown permission letter {letter:?}")]
pub struct UnknownPermission {
    /// The offending letter.
    pub letter: char,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_set_letters() {
        assert_eq!(PermissionSet::full().to_string(), "elradfmwM");
    }

    #[test]
    fn read_write_split() {
        assert_eq!(PermissionSet::READ.to_string(), "elr");
        assert_eq!(PermissionSet::WRITE.to_string(), "adfmwM");
        assert_eq!(PermissionSet::READ | PermissionSet::WRITE, PermissionSet::full());
    }

    #[test]
    fn letters_round_trip() {
        let set = PermissionSet::from_letters("elradfmwM").unwrap();
        assert_eq!(set, PermissionSet::full());
        assert_eq!(PermissionSet::from_letters(&set.to_string()).unwrap(), set);
    }

    #[test]
    fn chmod_letter_is_case_sensitive() {
        assert_eq!(PermissionSet::from_letter('M'), Some(PermissionSet::CHMOD));
        assert_eq!(PermissionSet::from_letter('e'), Some(PermissionSet::CHANGE_DIR));
        assert_eq!(PermissionSet::from_letter('x'), None);
    }

    #[test]
    fn unknown_letter_is_reported() {
        assert_eq!(PermissionSet::from_letters("elx"), Err(UnknownPermission { letter: 'x' }));
    }
}
