//! ABI tables of the Metriverse contracts
//!
//! Each table is a list of human-readable fragments, parsed once on first use.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::abi::Abi;

fn table(fragments: &[&str]) -> Arc<Abi> {
    Arc::new(Abi::parse(fragments).expect("static ABI table"))
}

const OWNABLE_FRAGMENTS: &[&str] = &[
    "event OwnershipTransferred(address indexed previousOwner, address indexed newOwner)",
    "function owner() view returns (address)",
    "function renounceOwnership()",
    "function transferOwnership(address newOwner)",
];

const PAUSABLE_FRAGMENTS: &[&str] = &[
    "event Paused(address account)",
    "event Unpaused(address account)",
    "function pause()",
    "function paused() view returns (bool)",
    "function unpause()",
];

const MRC20_FRAGMENTS: &[&str] = &[
    "event Approval(address indexed owner, address indexed spender, uint256 value)",
    "event Transfer(address indexed from, address indexed to, uint256 value)",
    "function allowance(address owner, address spender) view returns (uint256)",
    "function approve(address spender, uint256 amount) returns (bool)",
    "function balanceOf(address account) view returns (uint256)",
    "function decimals() view returns (uint8)",
    "function name() view returns (string)",
    "function symbol() view returns (string)",
    "function totalSupply() view returns (uint256)",
    "function transfer(address recipient, uint256 amount) returns (bool)",
    "function transferFrom(address sender, address recipient, uint256 amount) returns (bool)",
];

const MRC721_FRAGMENTS: &[&str] = &[
    "event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId)",
    "event ApprovalForAll(address indexed owner, address indexed operator, bool approved)",
    "event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)",
    "function approve(address to, uint256 tokenId)",
    "function balanceOf(address owner) view returns (uint256)",
    "function getApproved(uint256 tokenId) view returns (address)",
    "function isApprovedForAll(address owner, address operator) view returns (bool)",
    "function name() view returns (string)",
    "function ownerOf(uint256 tokenId) view returns (address)",
    "function safeTransferFrom(address from, address to, uint256 tokenId)",
    "function safeTransferFrom(address from, address to, uint256 tokenId, bytes data)",
    "function setApprovalForAll(address operator, bool approved)",
    "function supportsInterface(bytes4 interfaceId) view returns (bool)",
    "function symbol() view returns (string)",
    "function tokenByIndex(uint256 index) view returns (uint256)",
    "function tokenOfOwnerByIndex(address owner, uint256 index) view returns (uint256)",
    "function tokenURI(uint256 tokenId) view returns (string)",
    "function totalSupply() view returns (uint256)",
    "function transferFrom(address from, address to, uint256 tokenId)",
];

const GENERIC_MRC721_FRAGMENTS: &[&str] = &[
    "event ControllerChanged(address indexed controller, bool active)",
    "function controllers(address) view returns (bool)",
    "function mintUnique(address receiver, uint256 tokenId)",
    "function mintUnique(address receiver, uint256 tokenId, uint16 batchSize)",
    "function setBaseURI(string uri)",
    "function setController(address controller, bool active)",
];

const BURNABLE_FRAGMENTS: &[&str] = &["function burn(uint256 tokenId)"];

const ROYALTY_FRAGMENTS: &[&str] = &[
    "event RoyaltyChanged(address indexed beneficiary, uint96 royalty)",
    "function royaltyInfo() view returns (address beneficiary, uint96 royalty)",
    "function setRoyalty(address beneficiary, uint96 royalty)",
];

const METRIVERSE_CORE_FRAGMENTS: &[&str] = &[
    "event ControllerChanged(address indexed controller, bool active)",
    "event MRC721Created(address indexed contractAddress, address indexed creator, \
     address indexed factory)",
    "function approveToken(address assetAddress, bool approved)",
    "function approvedToken(address) view returns (bool)",
    "function auctionController() view returns (address)",
    "function auctionFee() view returns (uint96)",
    "function burnableFactory() view returns (address)",
    "function controllers(address) view returns (bool)",
    "function createMRC721(string _name, string _symbol, string _baseURI, bool burnable, \
     uint96 _royalty, address _beneficiary, bytes _signature) returns (address mrc721)",
    "function factory() view returns (address)",
    "function getAuctionRoyalty(uint256 price) view returns (uint256)",
    "function getControllers(address addr) view returns (bool)",
    "function internalToken(address) view returns (bool)",
    "function internalTokenCount() view returns (uint256)",
    "function internalTokenIndex(uint256) view returns (address)",
    "function isApprovedToken(address assetAddress) view returns (bool isApproved)",
    "function isInternalToken(address assetAddress) view returns (bool isInternal)",
    "function migrate(address core)",
    "function nonce(address) view returns (uint256)",
    "function permissionSlip(bytes32 info, uint96 _royalty, bool _burnable, uint256 _nonce, \
     address _beneficiary) pure returns (bytes32)",
    "function sendFunds(address receiver, uint256 amount)",
    "function setAuctionController(address _controller)",
    "function setAuctionFee(uint96 fee)",
    "function setBurnableFactory(address _factory)",
    "function setController(address controller, bool active)",
    "function setFactory(address _factory)",
    "function tokenInfo(string name, string symbol, string uri) pure returns (bytes32)",
];

const SIMPLE_AUCTION_FRAGMENTS: &[&str] = &[
    "error AuctionAlreadyEnded()",
    "error AuctionEndAlreadyCalled()",
    "error AuctionNotCancelable()",
    "error AuctionNotYetEnded()",
    "error BidBelowMinimum()",
    "error BidNotHighEnough(uint256 highestBid)",
    "event AuctionCanceled(address asset, uint256 tokenId)",
    "event AuctionCreated(address assetAddress, uint256 tokenId, uint256 minimumBid, \
     uint256 biddingTime, address beneficiaryAddress)",
    "event AuctionEnded(address asset, uint256 tokenId, address winner, uint256 amount)",
    "event HighestBidIncreased(address asset, uint256 tokenId, address bidder, uint256 amount)",
    "function auctionEnd(address assetAddress, uint256 tokenId)",
    "function auctions(address, uint256) view returns (address assetAddress, uint256 tokenId, \
     uint256 winningBid, uint256 minimumBid, uint256 biddingTime, uint256 startTime, \
     address winningBidder, address beneficiaryAddress, bool ended)",
    "function bid(address assetAddress, uint256 tokenId) payable",
    "function cancelAuction(address assetAddress, uint256 tokenId) returns (bool success)",
    "function claim(address assetAddress, uint256 tokenId) returns (bool success)",
    "function core() view returns (address)",
    "function createAuction(address assetAddress, uint256 tokenId, uint256 minimumBid, \
     uint256 biddingTime, address beneficiaryAddress) returns (bool success)",
    "function getAuction(address _assetAddress, uint256 _tokenId) view returns (uint256 tokenId, \
     uint256 winningBid, uint256 minimumBid, uint256 biddingTime, uint256 startTime, \
     address winningBidder, address beneficiaryAddress, bool ended)",
    "function onERC721Received(address, address, uint256, bytes) returns (bytes4)",
    "function pendingReturns(address) view returns (uint256)",
    "function withdraw() returns (bool success)",
];

const BASE_SALE_FRAGMENTS: &[&str] = &[
    "event SaleCanceled(address asset, uint256 tokenId)",
    "event SaleCreated(address assetAddress, uint256 tokenId, uint256 price, \
     address beneficiaryAddress)",
    "event SaleSuccessful(address asset, uint256 tokenId, uint256 price, address buyer)",
    "function cancelSale(address assetAddress, uint256 tokenId)",
    "function core() view returns (address)",
    "function createSale(address assetAddress, uint256 tokenId, uint256 price, \
     address beneficiaryAddress)",
    "function getSale(address assetAddress, uint256 tokenId) view returns (uint256 tokenId, \
     uint256 price, address beneficiaryAddress)",
    "function onERC721Received(address, address, uint256, bytes) returns (bytes4)",
    "function purchase(address assetAddress, uint256 tokenId) payable",
];

const AUCTION_CONTROLLER_FRAGMENTS: &[&str] = &[
    "function sale() view returns (address)",
    "function simpleAuction() view returns (address)",
];

fn combine(parts: &[&[&str]]) -> Arc<Abi> {
    let fragments: Vec<&str> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    table(&fragments)
}

/// `Ownable` base contract
pub static OWNABLE: Lazy<Arc<Abi>> = Lazy::new(|| table(OWNABLE_FRAGMENTS));

/// MRC20 fungible token
pub static MRC20: Lazy<Arc<Abi>> = Lazy::new(|| table(MRC20_FRAGMENTS));

/// MRC721 non-fungible token
pub static MRC721: Lazy<Arc<Abi>> = Lazy::new(|| table(MRC721_FRAGMENTS));

/// Factory-minted MRC721
pub static GENERIC_MRC721: Lazy<Arc<Abi>> = Lazy::new(|| {
    combine(&[MRC721_FRAGMENTS, OWNABLE_FRAGMENTS, GENERIC_MRC721_FRAGMENTS])
});

/// Factory-minted MRC721 with `burn`
pub static GENERIC_MRC721_BURNABLE: Lazy<Arc<Abi>> = Lazy::new(|| {
    combine(&[
        MRC721_FRAGMENTS,
        OWNABLE_FRAGMENTS,
        GENERIC_MRC721_FRAGMENTS,
        BURNABLE_FRAGMENTS,
    ])
});

/// Factory-minted MRC721 with royalties
pub static GENERIC_MRC721_ROYALTY: Lazy<Arc<Abi>> = Lazy::new(|| {
    combine(&[
        MRC721_FRAGMENTS,
        OWNABLE_FRAGMENTS,
        GENERIC_MRC721_FRAGMENTS,
        ROYALTY_FRAGMENTS,
    ])
});

/// Factory-minted MRC721 with `burn` and royalties
pub static GENERIC_MRC721_BURNABLE_ROYALTY: Lazy<Arc<Abi>> = Lazy::new(|| {
    combine(&[
        MRC721_FRAGMENTS,
        OWNABLE_FRAGMENTS,
        GENERIC_MRC721_FRAGMENTS,
        BURNABLE_FRAGMENTS,
        ROYALTY_FRAGMENTS,
    ])
});

/// Marketplace core
pub static METRIVERSE_CORE: Lazy<Arc<Abi>> =
    Lazy::new(|| combine(&[OWNABLE_FRAGMENTS, METRIVERSE_CORE_FRAGMENTS]));

/// English auction house
pub static SIMPLE_AUCTION: Lazy<Arc<Abi>> = Lazy::new(|| {
    combine(&[OWNABLE_FRAGMENTS, PAUSABLE_FRAGMENTS, SIMPLE_AUCTION_FRAGMENTS])
});

/// Fixed-price sales
pub static BASE_SALE: Lazy<Arc<Abi>> =
    Lazy::new(|| combine(&[OWNABLE_FRAGMENTS, PAUSABLE_FRAGMENTS, BASE_SALE_FRAGMENTS]));

/// Registry of the auction and sale contracts
pub static MRC721_AUCTION_CONTROLLER: Lazy<Arc<Abi>> =
    Lazy::new(|| combine(&[OWNABLE_FRAGMENTS, AUCTION_CONTROLLER_FRAGMENTS]));
