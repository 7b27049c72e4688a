pub mod init_test_schemas;
