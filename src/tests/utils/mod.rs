mod bitset;
