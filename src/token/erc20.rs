//! ERC-20 contract bindings.

use alloy::sol;

sol! {
    /// The subset of the ERC-20 interface used for detection and transfers.
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}
