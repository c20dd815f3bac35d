//! Fixed binary export of a tuple network.
//!
//! Layout (no header, no padding):
//!
//! ```text
//! row_table     65536 x f32 little-endian   key order 0..65536
//! square_table  65536 x f32 little-endian   only for FeatureSet::RowsAndSquares
//! ```
//!
//! The feature set is not stored in the file; readers must know it (the file
//! size tells the two layouts apart, see [`exported_len`]).

use std::io::{self, Read, Write};

use crate::{
    tuple_feature::FeatureSet,
    tuple_network::{TABLE_SIZE, TableLengthError, TupleNetwork, WeightTable},
};

const WEIGHT_BYTES: usize = size_of::<f32>();

/// Error returned by [`read_binary`].
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum BinaryWeightsError {
    #[display("failed to read weights: {_0}")]
    Io(io::Error),
    #[display("unexpected data after the last weight table")]
    #[from(skip)]
    TrailingData,
    #[display("{_0}")]
    TableLength(TableLengthError),
}

/// Size in bytes of an export with `feature_set`.
#[must_use]
pub const fn exported_len(feature_set: FeatureSet) -> usize {
    feature_set.table_count() * TABLE_SIZE * WEIGHT_BYTES
}

/// Writes the network's tables in export layout.
///
/// Callers should pass a buffered writer.
pub fn write_binary<W>(network: &TupleNetwork, writer: &mut W) -> io::Result<()>
where
    W: Write,
{
    write_table(network.row_table(), writer)?;
    if let Some(table) = network.square_table() {
        write_table(table, writer)?;
    }
    writer.flush()
}

/// Reads an export written with `feature_set`.
///
/// The reader must end exactly after the last table.
pub fn read_binary<R>(
    reader: &mut R,
    feature_set: FeatureSet,
) -> Result<TupleNetwork, BinaryWeightsError>
where
    R: Read,
{
    let row_table = read_table(reader)?;
    let square_table = if feature_set.has_squares() {
        Some(read_table(reader)?)
    } else {
        None
    };

    let mut probe = [0; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(BinaryWeightsError::TrailingData);
    }

    Ok(TupleNetwork::from_tables(row_table, square_table))
}

fn write_table<W>(table: &WeightTable, writer: &mut W) -> io::Result<()>
where
    W: Write,
{
    let bytes: Vec<u8> = table
        .as_slice()
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    writer.write_all(&bytes)
}

fn read_table<R>(reader: &mut R) -> Result<WeightTable, BinaryWeightsError>
where
    R: Read,
{
    let mut bytes = vec![0; TABLE_SIZE * WEIGHT_BYTES];
    reader.read_exact(&mut bytes)?;
    let weights = bytes
        .chunks_exact(WEIGHT_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Ok(WeightTable::from_vec(weights)?)
}

#[cfg(test)]
mod tests {
    use tdl2048_engine::BitBoard;

    use super::*;

    fn sample_network(feature_set: FeatureSet) -> TupleNetwork {
        let mut network = TupleNetwork::new(feature_set);
        let mut bits = 0x9E37_79B9_7F4A_7C15_u64;
        for step in 0..40 {
            bits ^= bits << 13;
            bits ^= bits >> 7;
            bits ^= bits << 17;
            #[expect(clippy::cast_precision_loss)]
            let delta = step as f32 - 17.5;
            network.update(BitBoard::from_bits(bits), delta, 0.03);
        }
        network
    }

    fn export(network: &TupleNetwork) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_binary(network, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_export_sizes() {
        let rows = export(&TupleNetwork::new(FeatureSet::Rows));
        assert_eq!(rows.len(), 65536 * 4);
        assert_eq!(rows.len(), exported_len(FeatureSet::Rows));

        let both = export(&TupleNetwork::new(FeatureSet::RowsAndSquares));
        assert_eq!(both.len(), 2 * 65536 * 4);
        assert_eq!(both.len(), exported_len(FeatureSet::RowsAndSquares));
    }

    #[test]
    fn test_index_order_is_preserved() {
        let network = sample_network(FeatureSet::RowsAndSquares);
        let bytes = export(&network);

        let square_offset = TABLE_SIZE * WEIGHT_BYTES;
        for key in [0_u16, 1, 0x0021, 0x1234, u16::MAX] {
            let at = usize::from(key) * WEIGHT_BYTES;
            let row = f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
            assert_eq!(row.to_bits(), network.row_table().get(key).to_bits());

            let at = square_offset + at;
            let square = f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
            let expected = network.square_table().unwrap().get(key);
            assert_eq!(square.to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_little_endian_layout() {
        let mut weights = vec![0.0; TABLE_SIZE];
        weights[1] = 1.0;
        let network = TupleNetwork::from_tables(WeightTable::from_vec(weights).unwrap(), None);
        let bytes = export(&network);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_read_back() {
        for feature_set in [FeatureSet::Rows, FeatureSet::RowsAndSquares] {
            let network = sample_network(feature_set);
            let bytes = export(&network);
            let restored = read_binary(&mut bytes.as_slice(), feature_set).unwrap();
            assert_eq!(restored, network);
        }
    }

    #[test]
    fn test_read_rejects_wrong_length() {
        let bytes = export(&sample_network(FeatureSet::RowsAndSquares));

        // a two-table file read as rows-only has a whole table left over
        let err = read_binary(&mut bytes.as_slice(), FeatureSet::Rows).unwrap_err();
        assert!(matches!(err, BinaryWeightsError::TrailingData));

        let truncated = &bytes[..bytes.len() - 2];
        let err = read_binary(&mut &truncated[..], FeatureSet::RowsAndSquares).unwrap_err();
        assert!(
            matches!(&err, BinaryWeightsError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
        );
    }

    #[test]
    fn test_error_conversions() {
        let err = BinaryWeightsError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, BinaryWeightsError::Io(_)));

        let length = WeightTable::from_vec(vec![0.0; 3]).unwrap_err();
        let err = BinaryWeightsError::from(length);
        assert!(matches!(err, BinaryWeightsError::TableLength(_)));
    }
}
