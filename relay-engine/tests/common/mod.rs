pub mod mock_transport;
