//! Generated bindings for the ERC-20 / ERC-4626 view functions a position read needs.
#![allow(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub, rust_2018_idioms)]

use ethers::contract::abigen;

abigen!(
    Erc4626,
    r#"[
        function balanceOf(address owner) external view returns (uint256)
        function decimals() external view returns (uint8)
        function symbol() external view returns (string)
        function name() external view returns (string)
        function asset() external view returns (address)
        function convertToAssets(uint256 shares) external view returns (uint256)
    ]"#
);

#[cfg(test)]
mod tests {
    use ethers::abi::{ParamType, Token, decode};

    // `symbol()` and `name()` outputs are decoded as a single `string` parameter
    fn decode_string_output(data: &[u8]) -> Result<Vec<Token>, ethers::abi::Error> {
        decode(&[ParamType::String], data)
    }

    fn string_return(offset: u8, length: [u8; 8]) -> Vec<u8> {
        let mut data = vec![0u8; 96];
        data[31] = offset;
        data[56..64].copy_from_slice(&length);
        data
    }

    #[test]
    fn test_well_formed_string_return_decodes() {
        let mut data = string_return(0x20, 4u64.to_be_bytes());
        data[64..68].copy_from_slice(b"USDC");

        assert_eq!(
            decode_string_output(&data).unwrap(),
            vec![Token::String("USDC".to_string())]
        );
    }

    #[test]
    fn test_oversized_string_length_is_a_decode_error() {
        let data = string_return(0x20, [0xff; 8]);
        assert!(decode_string_output(&data).is_err());
    }

    #[test]
    fn test_out_of_bounds_offset_is_a_decode_error() {
        let data = string_return(0xff, 4u64.to_be_bytes());
        assert!(decode_string_output(&data).is_err());
    }
}
