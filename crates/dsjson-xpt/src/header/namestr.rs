//! NAMESTR records: one per variable.
//!
//! | Offset | Field   | Type     | Description                    |
//! |--------|---------|----------|--------------------------------|
//! | 0      | ntype   | short    | 1=NUMERIC, 2=CHAR              |
//! | 2      | nhfun   | short    | Hash (always 0)                |
//! | 4      | nlng    | short    | Length in observation          |
//! | 6      | nvar0   | short    | Variable number                |
//! | 8      | nname   | char[8]  | Name                           |
//! | 16     | nlabel  | char[40] | Label                          |
//! | 56     | nform   | char[8]  | Format name                    |
//! | 64     | nfl     | short    | Format length                  |
//! | 66     | nfd     | short    | Format decimals                |
//! | 68     | nfj     | short    | Justification (0=left, 1=right)|
//! | 70     | nfill   | char[2]  | Padding                        |
//! | 72     | niform  | char[8]  | Informat name                  |
//! | 80     | nifl    | short    | Informat length                |
//! | 82     | nifd    | short    | Informat decimals              |
//! | 84     | npos    | long     | Position in observation        |
//! | 88     | rest    | char[52] | Reserved (48 on VAX/VMS)       |

use crate::error::{Result, XptError};
use crate::types::{Justification, XptColumn, XptType};

use super::{read_string, write_string};

pub const NAMESTR_LEN: usize = 140;
pub const NAMESTR_LEN_VAX: usize = 136;

/// Bytes that carry data; the remainder is reserved.
const NAMESTR_USED: usize = 88;

fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}

fn write_i16(buf: &mut [u8], offset: usize, value: i16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Parse one NAMESTR record. `index` is only used in error messages.
pub fn parse_namestr(data: &[u8], index: usize) -> Result<XptColumn> {
    let invalid = |message: String| XptError::InvalidNamestr { index, message };

    if data.len() < NAMESTR_USED {
        return Err(invalid(format!("data too short: {} bytes", data.len())));
    }

    let ntype = read_i16(data, 0);
    let data_type =
        XptType::from_ntype(ntype).ok_or_else(|| invalid(format!("invalid ntype: {ntype}")))?;

    let length = read_i16(data, 4);
    if length <= 0 {
        return Err(invalid(format!("invalid variable length: {length}")));
    }

    let name = read_string(data, 8, 8);
    if name.is_empty() {
        return Err(invalid("empty variable name".to_string()));
    }

    Ok(XptColumn {
        name,
        label: optional(read_string(data, 16, 40)),
        data_type,
        length: length as u16,
        format: optional(read_string(data, 56, 8)),
        format_length: read_i16(data, 64).max(0) as u16,
        format_decimals: read_i16(data, 66).max(0) as u16,
        informat: optional(read_string(data, 72, 8)),
        informat_length: read_i16(data, 80).max(0) as u16,
        informat_decimals: read_i16(data, 82).max(0) as u16,
        justification: Justification::from_nfj(read_i16(data, 68)),
    })
}

/// Build a 140-byte NAMESTR record.
///
/// `varnum` is 1-based; `position` is the byte offset within an observation.
#[must_use]
pub fn build_namestr(column: &XptColumn, varnum: u16, position: u32) -> [u8; NAMESTR_LEN] {
    let mut buf = [0u8; NAMESTR_LEN];

    write_i16(&mut buf, 0, column.data_type.to_ntype());
    write_i16(&mut buf, 4, column.length as i16);
    write_i16(&mut buf, 6, varnum as i16);
    write_string(&mut buf, 8, &column.name, 8);
    write_string(&mut buf, 16, column.label_or_empty(), 40);
    write_string(&mut buf, 56, column.format.as_deref().unwrap_or(""), 8);
    write_i16(&mut buf, 64, column.format_length as i16);
    write_i16(&mut buf, 66, column.format_decimals as i16);
    write_i16(&mut buf, 68, column.justification.to_nfj());
    write_string(&mut buf, 72, column.informat.as_deref().unwrap_or(""), 8);
    write_i16(&mut buf, 80, column.informat_length as i16);
    write_i16(&mut buf, 82, column.informat_decimals as i16);
    buf[84..88].copy_from_slice(&(position as i32).to_be_bytes());

    buf
}

/// Parse `var_count` consecutive NAMESTR records of `namestr_len` bytes each.
pub fn parse_namestr_records(
    data: &[u8],
    var_count: usize,
    namestr_len: usize,
) -> Result<Vec<XptColumn>> {
    let mut columns = Vec::with_capacity(var_count);

    for idx in 0..var_count {
        let offset = idx
            .checked_mul(namestr_len)
            .ok_or(XptError::ObservationOverflow)?;
        let record =
            data.get(offset..offset + namestr_len)
                .ok_or_else(|| XptError::InvalidNamestr {
                    index: idx,
                    message: "NAMESTR data out of bounds".to_string(),
                })?;
        columns.push(parse_namestr(record, idx)?);
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_namestr() {
        let col = XptColumn::numeric("AGE").with_label("Age in Years");

        let namestr = build_namestr(&col, 1, 0);
        let parsed = parse_namestr(&namestr, 0).unwrap();

        assert_eq!(parsed, col);
        assert_eq!(&namestr[8..16], b"AGE     ");
    }

    #[test]
    fn test_character_namestr_with_format() {
        let col = XptColumn::character("USUBJID", 20)
            .with_label("Unique Subject ID")
            .with_format("$", 20, 0)
            .with_informat("$", 20, 0)
            .with_justification(Justification::Right);

        let namestr = build_namestr(&col, 3, 8);
        let parsed = parse_namestr(&namestr, 0).unwrap();

        assert_eq!(parsed, col);
        assert_eq!(i16::from_be_bytes([namestr[6], namestr[7]]), 3);
        assert_eq!(
            i32::from_be_bytes([namestr[84], namestr[85], namestr[86], namestr[87]]),
            8
        );
    }

    #[test]
    fn test_invalid_records() {
        let mut namestr = [0u8; NAMESTR_LEN];
        namestr[1] = 5;
        assert!(parse_namestr(&namestr, 0).is_err());

        // numeric with zero length
        namestr[1] = 1;
        assert!(parse_namestr(&namestr, 0).is_err());

        assert!(parse_namestr(&namestr[..40], 0).is_err());
    }

    #[test]
    fn test_parse_vax_records() {
        let cols = [XptColumn::numeric("A"), XptColumn::character("B", 4)];
        let mut data = Vec::new();
        for (i, col) in cols.iter().enumerate() {
            data.extend_from_slice(&build_namestr(col, (i + 1) as u16, 0)[..NAMESTR_LEN_VAX]);
        }

        let parsed = parse_namestr_records(&data, 2, NAMESTR_LEN_VAX).unwrap();
        assert_eq!(parsed[0].name, "A");
        assert_eq!(parsed[1].name, "B");
        assert_eq!(parsed[1].length, 4);

        assert!(parse_namestr_records(&data, 3, NAMESTR_LEN_VAX).is_err());
    }
}
