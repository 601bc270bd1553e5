mod site_tests;
